pub mod activity_report;
pub mod change_record;
pub mod user_profile;
