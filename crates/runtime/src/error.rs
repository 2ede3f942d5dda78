//! Unified error types surfaced by the session API.
//!
//! Wraps repository failures and engine rejections so clients can bubble
//! them up with consistent context.

use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("room {0} does not exist")]
    RoomNotFound(String),

    #[error("room {0} already exists")]
    RoomExists(String),

    #[error("room {0} has not started its game yet")]
    NotStarted(String),

    #[error("room {0} has already started")]
    AlreadyStarted(String),

    #[error("room {0} has no players")]
    EmptyRoom(String),

    #[error(transparent)]
    Rejected(#[from] heist_core::Rejected),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
