pub mod event_log;
pub mod player_form;
pub mod player_list;
pub mod reconciliation_screen;
pub mod session_bar;
pub mod table_view;
