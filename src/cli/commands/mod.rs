pub mod active_users;
pub mod history;
pub mod init;
pub mod project;
pub mod roles;
pub mod users;
