pub mod json_change_log;
