//! Error types for Inkpad Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not found or access denied")]
    NotFoundOrForbidden,

    #[error("Not logged in")]
    Unauthenticated,

    #[error("No active code for this action")]
    NoActiveChallenge,

    #[error("Code expired")]
    Expired,

    #[error("Code does not match")]
    CodeMismatch,

    #[error("Code has not been verified")]
    NotVerified,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
