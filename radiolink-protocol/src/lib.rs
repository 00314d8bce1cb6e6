//! # radiolink-protocol
//!
//! Packet and message codec for low-bandwidth radio links.
//!
//! This crate provides:
//! - Fixed 9-byte packet header with CRC8 validation
//! - Application messages (action + body) carried across packets
//! - Fragmentation and reassembly of messages larger than one packet
//! - Link configuration and an abstract radio transport

pub mod codec;
pub mod config;
pub mod error;
pub mod fragment;
pub mod message;
pub mod packet;
pub mod transport;

pub use codec::{Assembler, Encoder};
pub use config::LinkConfig;
pub use error::{ConfigError, MessageError, PacketError, ProtocolError, STATUS_OK};
pub use fragment::{defragment, defragment_into, fragment, MAX_FRAGMENTS};
pub use message::{Message, MAX_MESSAGE_BODY_LENGTH, MAX_MESSAGE_LENGTH, MESSAGE_HEADER_LENGTH};
pub use packet::{
    Packet, BROADCAST_ID, MAX_PACKET_BODY_LENGTH, MAX_PACKET_LENGTH, PACKET_HEADER_LENGTH,
};
pub use transport::{Link, LoopbackTransport, Transport};

/// Packet protocol version written by default.
pub const PROTOCOL_VERSION: u8 = packet::DEFAULT_VERSION;
