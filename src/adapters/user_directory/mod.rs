pub mod json_user_directory;
