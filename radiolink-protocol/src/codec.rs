//! Encoder and assembler between messages and radio frames.
//!
//! The send side serializes a [`Message`], fragments it and seals every
//! packet. The receive side parses frames, collects the fragments of each
//! transmitter and yields the message once the bytes declared by its
//! header have arrived.

use crate::config::LinkConfig;
use crate::error::{MessageError, PacketError, ProtocolError};
use crate::fragment::{self, MAX_FRAGMENTS};
use crate::message::{Message, MAX_MESSAGE_BODY_LENGTH, MESSAGE_HEADER_LENGTH};
use crate::packet::{Packet, MAX_PACKET_LENGTH};
use bytes::Bytes;
use std::collections::HashMap;

/// Turns messages into sealed packets addressed per the link config.
#[derive(Debug, Clone)]
pub struct Encoder {
    transmitter_id: u16,
    receiver_id: u16,
    version: u8,
}

impl Encoder {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            transmitter_id: config.transmitter_id,
            receiver_id: config.receiver_id,
            version: config.version,
        }
    }

    /// Encodes a message into one or more packets, fragment numbers from 0.
    ///
    /// A message can span at most [`MAX_FRAGMENTS`] packets, so bodies
    /// longer than [`MAX_FRAGMENTED_LENGTH`] minus the 4-byte message header
    /// (62 972 bytes) fail with [`PacketError::TooManyFragments`], even
    /// though [`Message`] itself accepts up to 65 531 body bytes.
    ///
    /// [`MAX_FRAGMENTED_LENGTH`]: crate::fragment::MAX_FRAGMENTED_LENGTH
    pub fn encode_message(&self, message: &Message) -> Result<Vec<Packet>, ProtocolError> {
        let mut packets = fragment::fragment(message.data())?;
        for packet in &mut packets {
            packet.set_version(self.version);
            packet.set_transmitter_id(self.transmitter_id);
            packet.set_receiver_id(self.receiver_id);
            packet.seal();
        }

        tracing::debug!(
            "Encoded action {:#06x} ({} bytes) for {:#06x} into {} packet(s)",
            message.action(),
            message.message_length(),
            self.receiver_id,
            packets.len()
        );
        Ok(packets)
    }

    /// Encodes a message into wire frames ready for the transport.
    pub fn encode_frames(&self, message: &Message) -> Result<Vec<Bytes>, ProtocolError> {
        Ok(self
            .encode_message(message)?
            .iter()
            .map(Packet::encode)
            .collect())
    }
}

/// Fragments received so far from one transmitter.
#[derive(Debug, Default)]
struct PendingMessage {
    fragments: Vec<Packet>,
    buffered: usize,
    expected: Option<usize>,
}

impl PendingMessage {
    fn push(&mut self, packet: Packet) {
        self.buffered += packet.body().len();
        self.fragments.push(packet);

        if self.expected.is_none() && self.buffered >= 2 {
            let data = fragment::defragment(&self.fragments);
            let body_len = u16::from_be_bytes([data[0], data[1]]) as usize;
            self.expected = Some(MESSAGE_HEADER_LENGTH + body_len);
        }
    }

    fn is_complete(&self) -> bool {
        self.expected.is_some_and(|expected| self.buffered >= expected)
    }
}

/// Reassembles messages from received frames.
#[derive(Debug)]
pub struct Assembler {
    verify_checksums: bool,
    max_fragments: usize,
    pending: HashMap<u16, PendingMessage>,
}

impl Assembler {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            verify_checksums: config.verify_checksums,
            max_fragments: config.max_fragments.clamp(1, MAX_FRAGMENTS),
            pending: HashMap::new(),
        }
    }

    /// Parses one frame and feeds it to the assembler.
    ///
    /// The checksum is enforced when the config asks for it.
    pub fn push_frame(&mut self, frame: &[u8]) -> Result<Option<Message>, ProtocolError> {
        if frame.len() > MAX_PACKET_LENGTH {
            return Err(ProtocolError::FrameTooLarge {
                size: frame.len(),
                max: MAX_PACKET_LENGTH,
            });
        }

        let packet = if self.verify_checksums {
            Packet::parse_verified(frame)?
        } else {
            Packet::parse(frame)?
        };
        self.push_packet(packet)
    }

    /// Feeds a parsed packet to the assembler.
    ///
    /// Fragment 0 starts a new message for its transmitter, replacing any
    /// partial one. A fragment that does not continue the sequence drops
    /// the partial message and yields nothing.
    pub fn push_packet(&mut self, packet: Packet) -> Result<Option<Message>, ProtocolError> {
        let transmitter = packet.transmitter_id();
        let number = packet.fragment_number() as usize;

        if number >= self.max_fragments {
            self.pending.remove(&transmitter);
            return Err(PacketError::TooManyFragments {
                count: number + 1,
                max: self.max_fragments,
            }
            .into());
        }

        if number == 0 {
            if self.pending.remove(&transmitter).is_some() {
                tracing::debug!("Restarting incomplete message from {:#06x}", transmitter);
            }
        } else {
            let in_sequence = self
                .pending
                .get(&transmitter)
                .is_some_and(|p| p.fragments.len() == number);
            if !in_sequence {
                tracing::warn!(
                    "Dropping out-of-sequence fragment {} from {:#06x}",
                    number,
                    transmitter
                );
                self.pending.remove(&transmitter);
                return Ok(None);
            }
        }

        let pending = self.pending.entry(transmitter).or_default();
        pending.push(packet);

        if let Some(expected) = pending.expected {
            if expected - MESSAGE_HEADER_LENGTH > MAX_MESSAGE_BODY_LENGTH {
                self.pending.remove(&transmitter);
                return Err(MessageError::BodyLengthExceeded {
                    declared: expected - MESSAGE_HEADER_LENGTH,
                    max: MAX_MESSAGE_BODY_LENGTH,
                }
                .into());
            }
        }

        if !pending.is_complete() {
            tracing::trace!(
                "Buffered fragment {} from {:#06x} ({} bytes so far)",
                number,
                transmitter,
                pending.buffered
            );
            return Ok(None);
        }

        let complete = self.pending.remove(&transmitter).unwrap_or_default();
        let data = fragment::defragment(&complete.fragments);
        let message = Message::parse(&data)?;

        tracing::debug!(
            "Assembled action {:#06x} ({} bytes) from {:#06x} out of {} packet(s)",
            message.action(),
            message.message_length(),
            transmitter,
            complete.fragments.len()
        );
        Ok(Some(message))
    }

    /// Number of transmitters with a partially received message.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drops every partial message.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
