//! Splitting payloads across packets and joining them back.
//!
//! Fragments carry consecutive chunks of at most
//! [`MAX_PACKET_BODY_LENGTH`] bytes, numbered from 0 in emission order.
//! The fragment number is one byte, so a payload can span at most
//! [`MAX_FRAGMENTS`] packets.

use crate::error::PacketError;
use crate::packet::{fragment_count, Packet, MAX_PACKET_BODY_LENGTH};
use bytes::{BufMut, Bytes, BytesMut};

/// Maximum number of fragments one payload can be split into.
pub const MAX_FRAGMENTS: usize = u8::MAX as usize + 1;

/// Largest payload that can be fragmented (256 * 246 bytes).
pub const MAX_FRAGMENTED_LENGTH: usize = MAX_FRAGMENTS * MAX_PACKET_BODY_LENGTH;

/// Splits `data` into packets numbered 0, 1, 2, ...
///
/// An empty payload yields no packets. Headers other than the fragment
/// number and lengths keep their defaults; checksums are not computed.
pub fn fragment(data: &[u8]) -> Result<Vec<Packet>, PacketError> {
    let count = fragment_count(data.len());
    if count > MAX_FRAGMENTS {
        return Err(PacketError::TooManyFragments {
            count,
            max: MAX_FRAGMENTS,
        });
    }

    let mut packets = Vec::with_capacity(count);
    for (number, chunk) in data.chunks(MAX_PACKET_BODY_LENGTH).enumerate() {
        let mut packet = Packet::with_body(chunk)?;
        packet.set_fragment_number(number as u8);
        packets.push(packet);
    }

    tracing::debug!(
        "Fragmented {} bytes into {} packet(s)",
        data.len(),
        packets.len()
    );
    Ok(packets)
}

/// Appends the bodies of `packets`, in slice order, to `dst`.
///
/// Returns the number of bytes appended.
pub fn defragment_into(packets: &[Packet], dst: &mut BytesMut) -> usize {
    let total: usize = packets.iter().map(|p| p.body().len()).sum();
    dst.reserve(total);
    for packet in packets {
        dst.put_slice(packet.body());
    }
    total
}

/// Concatenates the bodies of `packets` in slice order.
pub fn defragment(packets: &[Packet]) -> Bytes {
    let mut buf = BytesMut::new();
    defragment_into(packets, &mut buf);
    buf.freeze()
}
