//! Host errors.
//!
//! Bridge operations never fail. Only host bookkeeping can, when a caller
//! drives the lifecycle out of order or the UI queue cannot take a message.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("node `{0}` is already mounted")]
    AlreadyMounted(String),

    #[error("node `{0}` is not mounted")]
    NotMounted(String),

    #[error("key `{0}` appears more than once in the tree")]
    DuplicateKey(String),

    #[error("UI queue is full")]
    QueueFull,

    #[error("UI queue is closed")]
    QueueClosed,
}

pub type Result<T> = std::result::Result<T, HostError>;
