pub mod activity_replay;
pub mod admin_service;
pub mod change_message;
pub mod change_recorder;
pub mod change_service;
pub mod permission_state;
pub mod span_tracker;
