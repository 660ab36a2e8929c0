//! Human-readable `details` text for each kind of change.

pub fn user_created(user_name: &str) -> String {
    format!("User '{user_name}' was created.")
}

pub fn user_deleted(user_name: &str) -> String {
    format!("User '{user_name}' was deleted.")
}

pub fn user_joined_role(user_name: &str, role_name: &str) -> String {
    format!("User '{user_name}' joined role '{role_name}'.")
}

pub fn user_left_role(user_name: &str, role_name: &str) -> String {
    format!("User '{user_name}' left role '{role_name}'.")
}

pub fn role_gained_permission(role_name: &str, permission: &str) -> String {
    format!("Role '{role_name}' gained permission '{permission}'.")
}

pub fn role_lost_permission(role_name: &str, permission: &str) -> String {
    format!("Role '{role_name}' lost permission '{permission}'.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_their_subjects() {
        assert_eq!(user_created("alice"), "User 'alice' was created.");
        assert_eq!(
            user_joined_role("alice", "students"),
            "User 'alice' joined role 'students'."
        );
        assert_eq!(
            role_lost_permission("students", "CanTakeExam"),
            "Role 'students' lost permission 'CanTakeExam'."
        );
    }
}
