//! Shared Dioxus UI components for the chip tracker.
//!
//! This crate is platform-agnostic: it provides the components and the
//! `UiMessage` type. The platform crate (`chip-web`) owns the
//! [`TrackerState`](chip_core::tracker::TrackerState) signal, applies
//! messages to it and drives the session clock.

pub mod components;

use chip_core::tracker::Command;

/// Messages sent from UI components to the background coroutine.
#[derive(Debug, Clone, PartialEq)]
pub enum UiMessage {
    /// A tracker command to apply to the shared state.
    Dispatch(Command),
}
