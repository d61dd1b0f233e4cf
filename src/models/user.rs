use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    #[serde(default)]
    pub following: HashSet<String>,
}

impl User {
    pub fn new(username: String, password_hash: String, display_name: String) -> Self {
        Self {
            username,
            password_hash,
            display_name,
            following: HashSet::new(),
        }
    }

    /// Adds `other` to the follow set (stored lowercased).
    /// Returns false if already following.
    pub fn follow(&mut self, other: &str) -> bool {
        self.following.insert(other.to_lowercase())
    }

    pub fn follows(&self, other: &str) -> bool {
        self.following.contains(&other.to_lowercase())
    }
}
