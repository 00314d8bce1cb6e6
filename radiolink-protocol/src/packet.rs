//! Radio packet format.
//!
//! A packet is what a single radio transmission carries, so the whole
//! packet is limited to 255 bytes (9 bytes header + up to 246 bytes body):
//!
//! ```text
//! +--------+---------+--------+--------+----------+----------+--------+
//! | length | version | tx id  | rx id  | fragment | body_len | crc8   |
//! | 1 byte | 1 byte  | 2 bytes| 2 bytes| 1 byte   | 1 byte   | 1 byte |
//! +--------+---------+--------+--------+----------+----------+--------+
//! | body                                                              |
//! | body_len bytes                                                    |
//! +-------------------------------------------------------------------+
//! ```
//!
//! Multi-byte fields are big-endian. The CRC8 covers the first 8 header
//! bytes followed by the body.

use crate::error::{MessageError, PacketError};
use crate::message::Message;
use bytes::Bytes;
use radiolink_buffer::{checksum, NetworkBuffer};

/// Maximum length of a whole packet, imposed by the radio line encoding.
pub const MAX_PACKET_LENGTH: usize = u8::MAX as usize;

/// Size of the fixed packet header in bytes.
pub const PACKET_HEADER_LENGTH: usize = 9;

/// Maximum packet body length (255 - 9 = 246).
pub const MAX_PACKET_BODY_LENGTH: usize = MAX_PACKET_LENGTH - PACKET_HEADER_LENGTH;

/// Receiver id addressing every station.
pub const BROADCAST_ID: u16 = 0xFFFF;

/// Packet protocol version written by default.
pub const DEFAULT_VERSION: u8 = 1;

const PACKET_LENGTH_OFFSET: usize = 0;
const VERSION_OFFSET: usize = 1;
const TRANSMITTER_ID_OFFSET: usize = 2;
const RECEIVER_ID_OFFSET: usize = 4;
const FRAGMENT_OFFSET: usize = 6;
const BODY_LENGTH_OFFSET: usize = 7;
const CRC8_OFFSET: usize = 8;

/// Header of a freshly constructed packet, in wire order.
pub const DEFAULT_HEADER: [u8; PACKET_HEADER_LENGTH] = [
    PACKET_HEADER_LENGTH as u8, // packet length
    DEFAULT_VERSION,            // version
    0x00,
    0x00, // transmitter id
    0xFF,
    0xFF, // receiver id
    1,    // fragment number
    0,    // body length
    0,    // crc8
];

/// Number of packets needed to carry `len` payload bytes.
pub fn fragment_count(len: usize) -> usize {
    len.div_ceil(MAX_PACKET_BODY_LENGTH)
}

/// A radio packet: fixed header plus body in one contiguous buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    data: NetworkBuffer,
}

impl Packet {
    /// Creates a packet with the default header and no body.
    pub fn new() -> Self {
        Self {
            data: NetworkBuffer::from_slice(&DEFAULT_HEADER),
        }
    }

    /// Creates a packet with the default header carrying `body`.
    pub fn with_body(body: &[u8]) -> Result<Self, PacketError> {
        let mut packet = Self::new();
        packet.set_body_data(body)?;
        Ok(packet)
    }

    /// Restores the default header and drops the body.
    pub fn reset(&mut self) {
        self.data.clear(false);
        self.data.resize(PACKET_HEADER_LENGTH, false);
        self.data.copy_from(&DEFAULT_HEADER);
    }

    pub fn packet_length(&self) -> u8 {
        self.data.get_u8(PACKET_LENGTH_OFFSET)
    }

    pub fn set_packet_length(&mut self, len: u8) {
        self.data.set_u8(len, PACKET_LENGTH_OFFSET);
    }

    pub fn version(&self) -> u8 {
        self.data.get_u8(VERSION_OFFSET)
    }

    pub fn set_version(&mut self, version: u8) {
        self.data.set_u8(version, VERSION_OFFSET);
    }

    pub fn transmitter_id(&self) -> u16 {
        self.data.get_u16(TRANSMITTER_ID_OFFSET)
    }

    pub fn set_transmitter_id(&mut self, id: u16) {
        self.data.set_u16(id, TRANSMITTER_ID_OFFSET);
    }

    pub fn receiver_id(&self) -> u16 {
        self.data.get_u16(RECEIVER_ID_OFFSET)
    }

    pub fn set_receiver_id(&mut self, id: u16) {
        self.data.set_u16(id, RECEIVER_ID_OFFSET);
    }

    pub fn fragment_number(&self) -> u8 {
        self.data.get_u8(FRAGMENT_OFFSET)
    }

    pub fn set_fragment_number(&mut self, n: u8) {
        self.data.set_u8(n, FRAGMENT_OFFSET);
    }

    pub fn body_length(&self) -> u8 {
        self.data.get_u8(BODY_LENGTH_OFFSET)
    }

    pub fn set_body_length(&mut self, len: u8) {
        self.data.set_u8(len, BODY_LENGTH_OFFSET);
    }

    pub fn crc8(&self) -> u8 {
        self.data.get_u8(CRC8_OFFSET)
    }

    pub fn set_crc8(&mut self, crc: u8) {
        self.data.set_u8(crc, CRC8_OFFSET);
    }

    /// The whole packet as it goes on the wire.
    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn header(&self) -> &[u8] {
        &self.data()[..PACKET_HEADER_LENGTH]
    }

    pub fn body(&self) -> &[u8] {
        &self.data()[PACKET_HEADER_LENGTH..]
    }

    /// Copies the header into `dst`; `false` if `dst` is too short.
    pub fn copy_header(&self, dst: &mut [u8]) -> bool {
        self.data.copy_to(dst, PACKET_HEADER_LENGTH)
    }

    /// Copies the body into `dst`; `false` if `dst` is too short.
    pub fn copy_body(&self, dst: &mut [u8]) -> bool {
        let body = self.body();
        if body.is_empty() {
            return true;
        }
        self.data.copy_to_at(dst, body.len(), PACKET_HEADER_LENGTH)
    }

    /// Total size on the wire.
    pub fn wire_size(&self) -> usize {
        self.data.length()
    }

    /// Encodes the packet into bytes.
    pub fn encode(&self) -> Bytes {
        Bytes::copy_from_slice(self.data())
    }

    /// Replaces the body with `body`.
    ///
    /// Updates the packet length and body length fields. Leaves the packet
    /// untouched if `body` exceeds [`MAX_PACKET_BODY_LENGTH`].
    pub fn set_body_data(&mut self, body: &[u8]) -> Result<(), PacketError> {
        self.resize_body(body.len(), false)?;
        self.data.set_bytes(body, PACKET_HEADER_LENGTH);
        Ok(())
    }

    /// Resizes the body to `len` bytes, always keeping the header.
    ///
    /// With `copy`, the retained body prefix is kept too; otherwise the body
    /// contents are unspecified. Updates the packet length and body length
    /// fields.
    pub fn resize_body(&mut self, len: usize, copy: bool) -> Result<(), PacketError> {
        if len > MAX_PACKET_BODY_LENGTH {
            return Err(PacketError::BodyTooLarge {
                len,
                max: MAX_PACKET_BODY_LENGTH,
            });
        }

        if copy {
            self.data.resize(PACKET_HEADER_LENGTH + len, true);
        } else {
            let mut header = [0u8; PACKET_HEADER_LENGTH];
            self.copy_header(&mut header);
            self.data.resize(PACKET_HEADER_LENGTH + len, false);
            self.data.copy_from(&header);
        }

        self.set_packet_length((PACKET_HEADER_LENGTH + len) as u8);
        self.set_body_length(len as u8);
        Ok(())
    }

    /// CRC8 over the header (minus the CRC field) and the body.
    ///
    /// Compute after the header and body are final.
    pub fn generate_checksum(&self) -> u8 {
        let crc = checksum::crc8(checksum::crc8_seed(), &self.header()[..CRC8_OFFSET]);
        checksum::crc8(crc, self.body())
    }

    /// Computes the checksum and stores it in the header.
    pub fn seal(&mut self) -> u8 {
        let crc = self.generate_checksum();
        self.set_crc8(crc);
        crc
    }

    /// Returns whether the stored CRC matches the packet contents.
    pub fn verify_checksum(&self) -> bool {
        self.crc8() == self.generate_checksum()
    }

    /// Parses the body as a [`Message`].
    pub fn message(&self) -> Result<Message, MessageError> {
        Message::parse(self.body())
    }

    /// Parses a packet from `buf`.
    ///
    /// Bytes past the declared body are ignored. The checksum is not
    /// checked; see [`Packet::parse_verified`].
    pub fn parse(buf: &[u8]) -> Result<Self, PacketError> {
        if buf.len() < PACKET_HEADER_LENGTH {
            tracing::debug!("Rejecting packet: {} byte header", buf.len());
            return Err(PacketError::IncompleteHeader { len: buf.len() });
        }

        let mut packet = Self {
            data: NetworkBuffer::from_slice(&buf[..PACKET_HEADER_LENGTH]),
        };

        let declared = packet.body_length() as usize;
        if declared > MAX_PACKET_BODY_LENGTH {
            tracing::debug!("Rejecting packet: declared body length {}", declared);
            return Err(PacketError::MaxLengthExceeded {
                declared,
                max: MAX_PACKET_BODY_LENGTH,
            });
        }

        let available = buf.len() - PACKET_HEADER_LENGTH;
        if declared > available {
            tracing::debug!(
                "Rejecting packet: declared body length {}, {} bytes available",
                declared,
                available
            );
            return Err(PacketError::InsufficientBytes {
                declared,
                available,
            });
        }

        packet.set_body_data(&buf[PACKET_HEADER_LENGTH..PACKET_HEADER_LENGTH + declared])?;
        Ok(packet)
    }

    /// Parses a packet and checks its CRC8.
    ///
    /// The CRC is computed over the bytes as received, before `parse`
    /// rewrites the packet length field.
    pub fn parse_verified(buf: &[u8]) -> Result<Self, PacketError> {
        let packet = Self::parse(buf)?;
        let body_end = PACKET_HEADER_LENGTH + packet.body().len();
        let crc = checksum::crc8(checksum::crc8_seed(), &buf[..CRC8_OFFSET]);
        let actual = checksum::crc8(crc, &buf[PACKET_HEADER_LENGTH..body_end]);
        if actual != packet.crc8() {
            tracing::warn!(
                "Packet CRC mismatch from {:#06x}: expected {:#04x}, got {:#04x}",
                packet.transmitter_id(),
                packet.crc8(),
                actual
            );
            return Err(PacketError::ChecksumMismatch {
                expected: packet.crc8(),
                actual,
            });
        }
        Ok(packet)
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<&[u8]> for Packet {
    type Error = PacketError;

    fn try_from(buf: &[u8]) -> Result<Self, Self::Error> {
        Self::parse(buf)
    }
}
