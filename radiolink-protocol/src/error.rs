//! Protocol error types and status codes.

use std::path::PathBuf;
use thiserror::Error;

/// Status code reported for a successful parse.
pub const STATUS_OK: u8 = 0;

/// Errors produced while building or parsing packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("incomplete packet header: got {len} bytes")]
    IncompleteHeader { len: usize },

    #[error("insufficient bytes: header declares {declared} body bytes, {available} available")]
    InsufficientBytes { declared: usize, available: usize },

    #[error("packet body length {declared} exceeds maximum {max}")]
    MaxLengthExceeded { declared: usize, max: usize },

    #[error("packet body too large: {len} bytes (max {max})")]
    BodyTooLarge { len: usize, max: usize },

    #[error("packet CRC mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("payload needs {count} fragments (max {max})")]
    TooManyFragments { count: usize, max: usize },
}

impl PacketError {
    /// Stable numeric status for this error.
    ///
    /// Parse failures are 1..=3; [`STATUS_OK`] is 0.
    pub fn code(&self) -> u8 {
        match self {
            PacketError::IncompleteHeader { .. } => 1,
            PacketError::InsufficientBytes { .. } => 2,
            PacketError::MaxLengthExceeded { .. } => 3,
            PacketError::BodyTooLarge { .. } => 4,
            PacketError::ChecksumMismatch { .. } => 5,
            PacketError::TooManyFragments { .. } => 6,
        }
    }
}

/// Errors produced while building or parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("insufficient header bytes: got {len} bytes")]
    InsufficientHeaderBytes { len: usize },

    #[error("insufficient buffer bytes: header declares {declared} body bytes, {available} available")]
    InsufficientBufferBytes { declared: usize, available: usize },

    #[error("message body length {declared} exceeds maximum {max}")]
    BodyLengthExceeded { declared: usize, max: usize },

    #[error("message body too large: {len} bytes (max {max})")]
    BodyTooLarge { len: usize, max: usize },
}

impl MessageError {
    /// Stable numeric status for this error.
    ///
    /// Parse failures are 1..=3; [`STATUS_OK`] is 0.
    pub fn code(&self) -> u8 {
        match self {
            MessageError::InsufficientHeaderBytes { .. } => 1,
            MessageError::InsufficientBufferBytes { .. } => 2,
            MessageError::BodyLengthExceeded { .. } => 3,
            MessageError::BodyTooLarge { .. } => 4,
        }
    }
}

/// Errors surfaced at the link boundary.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("packet error: {0}")]
    Packet(#[from] PacketError),

    #[error("message error: {0}")]
    Message(#[from] MessageError),

    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("transport closed")]
    TransportClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Returns whether the received bytes were damaged or malformed, as
    /// opposed to a local or transport failure.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            ProtocolError::Packet(_) | ProtocolError::Message(_) | ProtocolError::FrameTooLarge { .. }
        )
    }
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}
