//! # radiolink-buffer
//!
//! Storage layer for radiolink.
//!
//! This crate provides:
//! - `ByteBuffer`: heap byte storage with explicit length/capacity control
//! - `NetworkBuffer`: big-endian typed accessors over a `ByteBuffer`
//! - `checksum`: CRC8/CRC16, byte order conversion and memory wiping

pub mod byte_buffer;
pub mod checksum;
pub mod network_buffer;

pub use byte_buffer::ByteBuffer;
pub use checksum::{crc16, crc16_seed, crc8, crc8_seed};
pub use network_buffer::NetworkBuffer;
