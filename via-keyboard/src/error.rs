//! Keyboard command library error types

use thiserror::Error;
use via_transport::ViaError;

/// Errors from keyboard operations
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Protocol-level failure (timeout, superseded, disconnect, write)
    #[error("Protocol error: {0}")]
    Protocol(#[from] ViaError),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Device returned unexpected response
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}
