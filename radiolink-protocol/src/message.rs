//! Application message format.
//!
//! Messages ride inside packet bodies, split across several packets when
//! they do not fit in one:
//!
//! ```text
//! +----------+----------+----------------+
//! | body_len | action   | body           |
//! | 2 bytes  | 2 bytes  | body_len bytes |
//! +----------+----------+----------------+
//! ```
//!
//! Both header fields are big-endian.

use crate::error::MessageError;
use bytes::Bytes;
use radiolink_buffer::NetworkBuffer;

/// Maximum length of a whole message.
pub const MAX_MESSAGE_LENGTH: usize = u16::MAX as usize;

/// Size of the fixed message header in bytes.
pub const MESSAGE_HEADER_LENGTH: usize = 4;

/// Maximum message body length (65535 - 4 = 65531).
pub const MAX_MESSAGE_BODY_LENGTH: usize = MAX_MESSAGE_LENGTH - MESSAGE_HEADER_LENGTH;

const BODY_LENGTH_OFFSET: usize = 0;
const ACTION_OFFSET: usize = 2;

/// Header of a freshly constructed message: empty body, action 0.
pub const DEFAULT_MESSAGE_HEADER: [u8; MESSAGE_HEADER_LENGTH] = [0; MESSAGE_HEADER_LENGTH];

/// An action code plus an opaque body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    data: NetworkBuffer,
}

impl Message {
    /// Creates a message with action 0 and no body.
    pub fn new() -> Self {
        Self {
            data: NetworkBuffer::from_slice(&DEFAULT_MESSAGE_HEADER),
        }
    }

    /// Creates a message with action 0 carrying `body`.
    pub fn with_body(body: &[u8]) -> Result<Self, MessageError> {
        let mut message = Self::new();
        message.set_body_data(body)?;
        Ok(message)
    }

    /// Creates a message for `action` carrying `body`.
    pub fn with_action(action: u16, body: &[u8]) -> Result<Self, MessageError> {
        let mut message = Self::with_body(body)?;
        message.set_action(action);
        Ok(message)
    }

    /// Restores the default header and drops the body.
    pub fn reset(&mut self) {
        self.data.clear(false);
        self.data.resize(MESSAGE_HEADER_LENGTH, false);
        self.data.copy_from(&DEFAULT_MESSAGE_HEADER);
    }

    pub fn body_length(&self) -> u16 {
        self.data.get_u16(BODY_LENGTH_OFFSET)
    }

    pub fn set_body_length(&mut self, len: u16) {
        self.data.set_u16(len, BODY_LENGTH_OFFSET);
    }

    pub fn action(&self) -> u16 {
        self.data.get_u16(ACTION_OFFSET)
    }

    pub fn set_action(&mut self, action: u16) {
        self.data.set_u16(action, ACTION_OFFSET);
    }

    /// Total serialized length (header + body).
    pub fn message_length(&self) -> usize {
        self.data.length()
    }

    /// Absolute offset of the body byte at `offset`.
    pub fn body_offset(&self, offset: usize) -> usize {
        MESSAGE_HEADER_LENGTH + offset
    }

    /// The serialized message.
    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn header(&self) -> &[u8] {
        &self.data()[..MESSAGE_HEADER_LENGTH]
    }

    pub fn body(&self) -> &[u8] {
        &self.data()[MESSAGE_HEADER_LENGTH..]
    }

    /// Encodes the message into bytes.
    pub fn encode(&self) -> Bytes {
        Bytes::copy_from_slice(self.data())
    }

    /// Replaces the body with `body`, updating the body length field.
    ///
    /// Leaves the message untouched if `body` exceeds
    /// [`MAX_MESSAGE_BODY_LENGTH`].
    pub fn set_body_data(&mut self, body: &[u8]) -> Result<(), MessageError> {
        self.resize_body(body.len(), false)?;
        self.data.set_bytes(body, MESSAGE_HEADER_LENGTH);
        Ok(())
    }

    /// Resizes the body to `len` bytes, always keeping the header.
    ///
    /// With `copy`, the retained body prefix is kept too.
    pub fn resize_body(&mut self, len: usize, copy: bool) -> Result<(), MessageError> {
        if len > MAX_MESSAGE_BODY_LENGTH {
            return Err(MessageError::BodyTooLarge {
                len,
                max: MAX_MESSAGE_BODY_LENGTH,
            });
        }

        if copy {
            self.data.resize(MESSAGE_HEADER_LENGTH + len, true);
        } else {
            let mut header = [0u8; MESSAGE_HEADER_LENGTH];
            self.data.copy_to(&mut header, MESSAGE_HEADER_LENGTH);
            self.data.resize(MESSAGE_HEADER_LENGTH + len, false);
            self.data.copy_from(&header);
        }

        self.set_body_length(len as u16);
        Ok(())
    }

    /// Parses a message from `buf`.
    ///
    /// Bytes past the declared body are ignored, so a reassembled packet
    /// stream with padding still parses.
    pub fn parse(buf: &[u8]) -> Result<Self, MessageError> {
        if buf.len() < MESSAGE_HEADER_LENGTH {
            tracing::debug!("Rejecting message: {} byte header", buf.len());
            return Err(MessageError::InsufficientHeaderBytes { len: buf.len() });
        }

        let mut message = Self {
            data: NetworkBuffer::from_slice(&buf[..MESSAGE_HEADER_LENGTH]),
        };

        let declared = message.body_length() as usize;
        if declared > MAX_MESSAGE_BODY_LENGTH {
            tracing::debug!("Rejecting message: declared body length {}", declared);
            return Err(MessageError::BodyLengthExceeded {
                declared,
                max: MAX_MESSAGE_BODY_LENGTH,
            });
        }

        let available = buf.len() - MESSAGE_HEADER_LENGTH;
        if declared > available {
            tracing::debug!(
                "Rejecting message: declared body length {}, {} bytes available",
                declared,
                available
            );
            return Err(MessageError::InsufficientBufferBytes {
                declared,
                available,
            });
        }

        message.set_body_data(&buf[MESSAGE_HEADER_LENGTH..MESSAGE_HEADER_LENGTH + declared])?;
        Ok(message)
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<&[u8]> for Message {
    type Error = MessageError;

    fn try_from(buf: &[u8]) -> Result<Self, Self::Error> {
        Self::parse(buf)
    }
}
