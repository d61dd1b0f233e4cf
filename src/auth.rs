//! Registration and login against the identity store.
//!
//! There is no session state: "being logged in" is the caller holding the
//! `User` value a successful login returned.

use crate::errors::{AuthError, PersistError};
use crate::models::User;
use crate::persist::Storage;
use crate::platform::Platform;
use bcrypt::{DEFAULT_COST, hash, verify};
use std::sync::Arc;
use tracing::info;

pub const MIN_PASSWORD_LEN: usize = 4;

/// One-way password hashing, kept behind a trait so the store never
/// compares plaintext itself.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError>;
    fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, AuthError>;
}

/// bcrypt-backed hasher. Salted, so credential checks go through
/// `verify` rather than string equality.
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Lower costs keep test suites fast; bcrypt's minimum is 4.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        Ok(hash(plaintext, self.cost)?)
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, AuthError> {
        Ok(verify(plaintext, hashed)?)
    }
}

pub struct AuthService {
    platform: Platform,
    hasher: Box<dyn PasswordHasher>,
    storage: Arc<dyn Storage>,
}

impl AuthService {
    pub fn new(platform: Platform, hasher: Box<dyn PasswordHasher>, storage: Arc<dyn Storage>) -> Self {
        Self {
            platform,
            hasher,
            storage,
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Creates a user and takes a persistence snapshot.
    ///
    /// The display name defaults to the username when blank. A persist
    /// failure is propagated; the in-memory registration stands.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        if self.platform.username_exists(username) {
            return Err(AuthError::UsernameTaken);
        }
        let password = password.trim();
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }

        let display_name = display_name.trim();
        let user = User::new(
            username.to_string(),
            self.hasher.hash(password)?,
            if display_name.is_empty() {
                username.to_string()
            } else {
                display_name.to_string()
            },
        );

        self.platform.add_user(user.clone());
        self.save()?;

        info!("new user registered: {}", user.username);
        Ok(user)
    }

    /// Verifies credentials and returns the user's handle.
    pub fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .platform
            .get_user(username.trim())
            .ok_or(AuthError::UserNotFound)?;

        if !self.hasher.verify(password.trim(), &user.password_hash)? {
            return Err(AuthError::WrongPassword);
        }

        info!("user logged in: {}", user.username);
        Ok(user)
    }

    /// Persists a snapshot of the current store. Called at save points:
    /// registration, logout, exit.
    pub fn save(&self) -> Result<(), PersistError> {
        self.storage.persist(&self.platform.snapshot())
    }

    /// Restores the store from the last snapshot, if one exists.
    /// Returns whether anything was restored.
    pub fn load(&self) -> Result<bool, PersistError> {
        match self.storage.restore()? {
            Some(snapshot) => {
                self.platform.restore(snapshot);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
