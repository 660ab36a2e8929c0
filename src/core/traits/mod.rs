pub mod change_log;
pub mod user_directory;
