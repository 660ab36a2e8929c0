use std::collections::HashMap;

use crate::core::errors::Result;
use crate::core::models::user_profile::UserProfile;

/// Port for looking up and managing the users that currently exist.
pub trait UserDirectory: Send + Sync {
    /// Add a user to the directory.
    fn add(&self, user: &UserProfile) -> Result<()>;

    /// List all users.
    fn list(&self) -> Result<Vec<UserProfile>>;

    /// Remove a user by id, returning the removed profile.
    fn remove(&self, user_id: &str) -> Result<UserProfile>;

    /// Find a single user by id.
    fn find(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.list()?.into_iter().find(|u| u.id == user_id))
    }

    /// Find the users among `user_ids` that exist, keyed by id.
    fn find_many(&self, user_ids: &[&str]) -> Result<HashMap<String, UserProfile>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|u| user_ids.contains(&u.id.as_str()))
            .map(|u| (u.id.clone(), u))
            .collect())
    }
}
