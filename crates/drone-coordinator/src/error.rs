//! Coordinator-level errors. Every per-tick operational path is infallible;
//! the enum here only covers the one boundary that can genuinely fail:
//! malformed wire packets and comms connect/disconnect failures surfaced
//! from the injected interface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("wire packet too short: expected {expected} bytes, got {actual}")]
    PacketTooShort { expected: usize, actual: usize },

    #[error("comms connect failed: {0}")]
    ConnectFailed(String),

    #[error("comms disconnect failed: {0}")]
    DisconnectFailed(String),
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;
