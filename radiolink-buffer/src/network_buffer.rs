//! Network byte order accessors over a [`ByteBuffer`].
//!
//! Every multi-byte field of the packet and message headers goes through
//! these accessors. Writes grow the buffer like [`ByteBuffer::copy_from_at`];
//! reads of a range that is not fully valid return 0.

use crate::byte_buffer::ByteBuffer;
use crate::checksum::{hton16, hton32, hton64, ntoh16, ntoh32, ntoh64};
use std::ops::{Deref, DerefMut};

/// A [`ByteBuffer`] with big-endian typed field access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkBuffer {
    inner: ByteBuffer,
}

impl NetworkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_length(length: usize) -> Self {
        Self {
            inner: ByteBuffer::with_length(length),
        }
    }

    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            inner: ByteBuffer::from_slice(data),
        }
    }

    pub fn set_u8(&mut self, value: u8, offset: usize) {
        self.inner.copy_from_at(&[value], offset);
    }

    pub fn set_u16(&mut self, value: u16, offset: usize) {
        self.inner.copy_from_at(&hton16(value).to_ne_bytes(), offset);
    }

    pub fn set_u32(&mut self, value: u32, offset: usize) {
        self.inner.copy_from_at(&hton32(value).to_ne_bytes(), offset);
    }

    pub fn set_u64(&mut self, value: u64, offset: usize) {
        self.inner.copy_from_at(&hton64(value).to_ne_bytes(), offset);
    }

    /// Writes raw bytes at `offset`.
    pub fn set_bytes(&mut self, bytes: &[u8], offset: usize) {
        self.inner.copy_from_at(bytes, offset);
    }

    pub fn get_u8(&self, offset: usize) -> u8 {
        let mut raw = [0u8; 1];
        self.inner.copy_to_at(&mut raw, 1, offset);
        raw[0]
    }

    pub fn get_u16(&self, offset: usize) -> u16 {
        let mut raw = [0u8; 2];
        self.inner.copy_to_at(&mut raw, 2, offset);
        ntoh16(u16::from_ne_bytes(raw))
    }

    pub fn get_u32(&self, offset: usize) -> u32 {
        let mut raw = [0u8; 4];
        self.inner.copy_to_at(&mut raw, 4, offset);
        ntoh32(u32::from_ne_bytes(raw))
    }

    pub fn get_u64(&self, offset: usize) -> u64 {
        let mut raw = [0u8; 8];
        self.inner.copy_to_at(&mut raw, 8, offset);
        ntoh64(u64::from_ne_bytes(raw))
    }

    /// Reads `dst.len()` raw bytes starting at `offset`.
    pub fn get_bytes(&self, dst: &mut [u8], offset: usize) -> bool {
        let len = dst.len();
        self.inner.copy_to_at(dst, len, offset)
    }

    pub fn into_inner(self) -> ByteBuffer {
        self.inner
    }
}

impl Deref for NetworkBuffer {
    type Target = ByteBuffer;

    fn deref(&self) -> &ByteBuffer {
        &self.inner
    }
}

impl DerefMut for NetworkBuffer {
    fn deref_mut(&mut self) -> &mut ByteBuffer {
        &mut self.inner
    }
}

impl From<ByteBuffer> for NetworkBuffer {
    fn from(inner: ByteBuffer) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_is_big_endian() {
        let mut buf = NetworkBuffer::with_length(4);
        buf.set_u16(0x1234, 1);
        assert_eq!(buf.as_slice(), &[0x00, 0x12, 0x34, 0x00]);
        assert_eq!(buf.get_u16(1), 0x1234);
    }

    #[test]
    fn test_u32_and_u64() {
        let mut buf = NetworkBuffer::new();
        buf.set_u32(0xDEAD_BEEF, 0);
        buf.set_u64(0x0102_0304_0506_0708, 4);

        assert_eq!(buf.length(), 12);
        assert_eq!(&buf.as_slice()[..4], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(&buf.as_slice()[4..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(buf.get_u32(0), 0xDEAD_BEEF);
        assert_eq!(buf.get_u64(4), 0x0102_0304_0506_0708);
    }

    #[test]
    fn test_set_grows_buffer() {
        let mut buf = NetworkBuffer::from_slice(&[0xAA]);
        buf.set_u16(0xBBCC, 1);
        assert_eq!(buf.as_slice(), &[0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_u8_and_bytes() {
        let mut buf = NetworkBuffer::with_length(2);
        buf.set_u8(0x7F, 1);
        buf.set_bytes(&[1, 2, 3], 2);
        assert_eq!(buf.get_u8(1), 0x7F);

        let mut dst = [0u8; 3];
        assert!(buf.get_bytes(&mut dst, 2));
        assert_eq!(dst, [1, 2, 3]);
    }

    #[test]
    fn test_getters_read_exact_width() {
        let buf = NetworkBuffer::from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(buf.get_u8(8), 0x09);
        assert_eq!(buf.get_u16(7), 0x0809);
        assert_eq!(buf.get_u32(5), 0x0607_0809);
        assert_eq!(buf.get_u64(1), 0x0203_0405_0607_0809);

        let mut dst = [0u8; 9];
        assert!(buf.get_bytes(&mut dst, 0));
        assert_eq!(dst, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_get_out_of_range_returns_zero() {
        let buf = NetworkBuffer::from_slice(&[0xFF, 0xFF, 0xFF]);
        assert_eq!(buf.get_u16(2), 0);
        assert_eq!(buf.get_u32(0), 0);
        assert_eq!(buf.get_u8(3), 0);
    }
}
