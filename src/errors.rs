use thiserror::Error;

/// Failures surfaced by registration and login.
///
/// Store-level outcomes (unknown id, non-owner requester) are reported as
/// `bool`/`Option` results on the store itself, not as errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username can't be empty")]
    EmptyUsername,
    #[error("username already taken")]
    UsernameTaken,
    #[error("password too short (min 4)")]
    PasswordTooShort,
    #[error("no such user")]
    UserNotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Persistence(#[from] PersistError),
}

/// Snapshot write/read failures. Opaque to the store: a failed persist
/// leaves both in-memory and prior durable state unchanged.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed data file: {0}")]
    Decode(#[from] serde_json::Error),
}
