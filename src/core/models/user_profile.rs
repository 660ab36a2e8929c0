use serde::{Deserialize, Serialize};

/// Avatar shown for users without one, and for users that no longer exist.
pub const DEFAULT_AVATAR_PATH: &str = "/images/default-avatar.jpg";

/// A user that currently exists in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub user_name: String,
    pub display_name: String,
    #[serde(default = "default_avatar")]
    pub avatar_relative_path: String,
}

fn default_avatar() -> String {
    DEFAULT_AVATAR_PATH.to_string()
}

impl std::fmt::Display for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.user_name, self.display_name)
    }
}
