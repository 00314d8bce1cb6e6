//! Radio transport boundary and a message-level link on top of it.
//!
//! The physical driver is opaque: it sends and receives frames of at most
//! [`MAX_PACKET_LENGTH`] bytes. Delivery, ordering and retransmission are
//! the driver's concern, not this crate's.

use crate::codec::{Assembler, Encoder};
use crate::config::LinkConfig;
use crate::error::ProtocolError;
use crate::message::Message;
use crate::packet::MAX_PACKET_LENGTH;
use bytes::Bytes;
use std::collections::VecDeque;

/// A byte-oriented radio driver.
pub trait Transport {
    /// Transmits one frame of at most [`MAX_PACKET_LENGTH`] bytes.
    fn send(&mut self, frame: &[u8]) -> Result<(), ProtocolError>;

    /// Returns the next received frame, or `None` if nothing is waiting.
    fn receive(&mut self) -> Result<Option<Bytes>, ProtocolError>;
}

/// In-memory transport that hands sent frames back on receive.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    queue: VecDeque<Bytes>,
    closed: bool,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames waiting to be received.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Injects a raw frame as if it had been received.
    pub fn inject(&mut self, frame: Bytes) {
        self.queue.push_back(frame);
    }

    /// Drops a queued frame, simulating loss on the air.
    pub fn drop_frame(&mut self, index: usize) -> Option<Bytes> {
        self.queue.remove(index)
    }

    /// Closes the transport; further sends fail.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl Transport for LoopbackTransport {
    fn send(&mut self, frame: &[u8]) -> Result<(), ProtocolError> {
        if self.closed {
            return Err(ProtocolError::TransportClosed);
        }
        if frame.len() > MAX_PACKET_LENGTH {
            return Err(ProtocolError::FrameTooLarge {
                size: frame.len(),
                max: MAX_PACKET_LENGTH,
            });
        }
        self.queue.push_back(Bytes::copy_from_slice(frame));
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<Bytes>, ProtocolError> {
        Ok(self.queue.pop_front())
    }
}

/// Sends and receives whole messages over a [`Transport`].
#[derive(Debug)]
pub struct Link<T: Transport> {
    encoder: Encoder,
    assembler: Assembler,
    transport: T,
}

impl<T: Transport> Link<T> {
    pub fn new(config: &LinkConfig, transport: T) -> Self {
        Self {
            encoder: Encoder::new(config),
            assembler: Assembler::new(config),
            transport,
        }
    }

    /// Builds a message from `action` and `body` and transmits it.
    ///
    /// Returns the number of frames sent. The body is limited to 62 972
    /// bytes, what [`MAX_FRAGMENTS`] packets can carry after the message
    /// header; longer bodies fail with `TooManyFragments` before anything
    /// is sent.
    ///
    /// [`MAX_FRAGMENTS`]: crate::fragment::MAX_FRAGMENTS
    pub fn send_message(&mut self, action: u16, body: &[u8]) -> Result<usize, ProtocolError> {
        let message = Message::with_action(action, body)?;
        self.send(&message)
    }

    /// Transmits an already built message.
    pub fn send(&mut self, message: &Message) -> Result<usize, ProtocolError> {
        let frames = self.encoder.encode_frames(message)?;
        for frame in &frames {
            self.transport.send(frame)?;
        }
        Ok(frames.len())
    }

    /// Drains received frames until a full message is assembled.
    ///
    /// Returns `(action, body)`, or `None` once the transport has nothing
    /// more to give. A malformed frame is reported as an error; polling
    /// again continues with the next frame.
    pub fn poll_message(&mut self) -> Result<Option<(u16, Bytes)>, ProtocolError> {
        while let Some(frame) = self.transport.receive()? {
            if let Some(message) = self.assembler.push_frame(&frame)? {
                let body = Bytes::copy_from_slice(message.body());
                return Ok(Some((message.action(), body)));
            }
        }
        Ok(None)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}
