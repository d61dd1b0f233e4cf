use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Username of the author. Never changes after creation.
    pub author: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: i64,
    #[serde(default)]
    pub last_updated: Option<i64>,
    /// Lowercased usernames of everyone who currently likes this recipe.
    #[serde(default)]
    pub likes: HashSet<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Recipe {
    /// Flips `username`'s membership in the like set.
    /// Returns the resulting state: true = now liked, false = now unliked.
    pub fn toggle_like(&mut self, username: &str) -> bool {
        let key = username.to_lowercase();
        if self.likes.remove(&key) {
            false
        } else {
            self.likes.insert(key);
            true
        }
    }

    pub fn liked_by(&self, username: &str) -> bool {
        self.likes.contains(&username.to_lowercase())
    }
}
