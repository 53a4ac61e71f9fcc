pub mod money;
pub mod reconciliation;
pub mod roster;
pub mod seat;
pub mod session;
pub mod tracker;

#[cfg(feature = "native")]
pub mod controller;
#[cfg(feature = "native")]
pub mod timer;
