//! Growable byte storage with explicit capacity control.
//!
//! A [`ByteBuffer`] tracks two sizes: the allocated `capacity` and the
//! logically valid `length` (always `length <= capacity`). Shrinking the
//! length never releases memory; [`ByteBuffer::reclaim`] does that on
//! request.
//!
//! Invalid arguments (out-of-range offsets, oversized reads) are silent
//! no-ops at this level. Callers that need to signal failure must check
//! bounds themselves before delegating here.
//!
//! Slices borrowed from the buffer (`as_slice`, `slice_from`, ...) are tied
//! to a shared borrow, so they cannot be held across `resize`, `allocate`,
//! `reclaim`, `clear` or `dispose`.

use crate::checksum;
use std::ops::{Index, IndexMut};

/// Heap-allocated byte region with separate length and capacity.
#[derive(Debug, Default)]
pub struct ByteBuffer {
    storage: Option<Box<[u8]>>,
    length: usize,
}

impl ByteBuffer {
    /// Creates an empty, unallocated buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer whose first `length` bytes are valid (and zeroed).
    pub fn with_length(length: usize) -> Self {
        let mut buf = Self::new();
        buf.resize(length, false);
        buf
    }

    /// Creates a buffer holding a copy of `data`.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut buf = Self::with_length(data.len());
        buf.copy_from(data);
        buf
    }

    /// Number of logically valid bytes.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of allocated bytes.
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().map_or(0, |s| s.len())
    }

    /// Returns whether backing storage currently exists.
    pub fn is_allocated(&self) -> bool {
        self.storage.is_some()
    }

    /// The valid bytes `[0, length)`.
    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            Some(storage) => &storage[..self.length],
            None => &[],
        }
    }

    /// Mutable view of the valid bytes `[0, length)`.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Some(storage) => &mut storage[..self.length],
            None => &mut [],
        }
    }

    /// Checked single-byte access.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_slice().get(index).copied()
    }

    /// The valid bytes starting at `index`.
    ///
    /// `None` if the buffer is unallocated or `index > length`.
    pub fn slice_from(&self, index: usize) -> Option<&[u8]> {
        self.storage.as_ref()?;
        self.as_slice().get(index..)
    }

    /// Mutable view of the valid bytes starting at `index`.
    pub fn slice_from_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        self.storage.as_ref()?;
        self.as_mut_slice().get_mut(index..)
    }

    /// Offset one past the last valid byte.
    pub fn end(&self) -> usize {
        self.length
    }

    /// Recovers the offset of a slice previously borrowed from this buffer.
    ///
    /// `None` if the buffer is unallocated or `slice` does not start inside
    /// the allocated region.
    pub fn idx_of(&self, slice: &[u8]) -> Option<usize> {
        let storage = self.storage.as_ref()?;
        let base = storage.as_ptr() as usize;
        let ptr = slice.as_ptr() as usize;
        if ptr < base || ptr > base + storage.len() {
            return None;
        }
        Some(ptr - base)
    }

    /// Sets the logical length to `new_length`.
    ///
    /// If the current capacity already fits, only the length changes and
    /// bytes past the new boundary stay in storage (unreachable until the
    /// length grows again). Otherwise storage is reallocated to exactly
    /// `new_length`, keeping the existing bytes when `copy` is set.
    pub fn resize(&mut self, new_length: usize, copy: bool) {
        if self.storage.is_some() && new_length <= self.capacity() {
            self.length = new_length;
            return;
        }

        self.allocate(new_length, copy, false);
        self.length = new_length;
    }

    /// Reallocates storage to `new_capacity` without changing the length.
    ///
    /// No-op if storage exists and `new_capacity <= length`. With `copy`,
    /// the valid bytes move to the new region; with `zero`, the old region
    /// is wiped before it is released.
    pub fn allocate(&mut self, new_capacity: usize, copy: bool, zero: bool) {
        if self.storage.is_some() && new_capacity <= self.length {
            return;
        }

        tracing::trace!(
            "Reallocating buffer: {} -> {} bytes (length {})",
            self.capacity(),
            new_capacity,
            self.length
        );

        let mut next = vec![0u8; new_capacity].into_boxed_slice();
        if copy {
            let keep = self.length.min(new_capacity);
            next[..keep].copy_from_slice(&self.as_slice()[..keep]);
        }

        self.release(zero);
        self.storage = Some(next);
    }

    /// Shrinks capacity to exactly the current length.
    ///
    /// No-op if there is no slack.
    pub fn reclaim(&mut self, zero: bool) {
        if self.capacity() <= self.length {
            return;
        }

        let next: Box<[u8]> = self.as_slice().into();
        self.release(zero);
        self.storage = Some(next);
    }

    /// Sets the length to zero, keeping the allocation.
    ///
    /// With `zero`, the whole allocated region is wiped.
    pub fn clear(&mut self, zero: bool) {
        self.length = 0;
        if zero {
            if let Some(storage) = &mut self.storage {
                checksum::zero(storage);
            }
        }
    }

    /// Clears the buffer and releases its storage.
    ///
    /// With `safe`, the storage is wiped before release.
    pub fn dispose(&mut self, safe: bool) {
        self.clear(safe);
        self.storage = None;
    }

    /// Copies `src` into the buffer starting at offset 0.
    pub fn copy_from(&mut self, src: &[u8]) -> bool {
        self.copy_from_at(src, 0)
    }

    /// Copies `src` into the buffer starting at `offset`.
    ///
    /// The buffer grows (preserving data) when the copy runs past the
    /// current length. `offset` must not exceed the current length; it is
    /// not a growth trigger. Returns whether anything was copied.
    pub fn copy_from_at(&mut self, src: &[u8], offset: usize) -> bool {
        if src.is_empty() || offset > self.length {
            return false;
        }

        let end = offset + src.len();
        if end > self.length {
            self.resize(end, true);
        }

        match &mut self.storage {
            Some(storage) => {
                storage[offset..end].copy_from_slice(src);
                true
            }
            None => false,
        }
    }

    /// Copies `len` bytes from offset 0 into `dst`.
    ///
    /// A `len` of 0 copies the whole current length.
    pub fn copy_to(&self, dst: &mut [u8], len: usize) -> bool {
        let len = if len == 0 { self.length } else { len };
        self.copy_to_at(dst, len, 0)
    }

    /// Copies `len` bytes starting at `offset` into `dst[..len]`.
    ///
    /// No-op if `len` exceeds the current length, `dst` is too short,
    /// `offset` is outside the valid range, or the range runs past the
    /// current length. Returns whether anything was copied.
    pub fn copy_to_at(&self, dst: &mut [u8], len: usize, offset: usize) -> bool {
        if len > self.length || len > dst.len() {
            return false;
        }
        if offset >= self.length {
            return false;
        }
        let end = match offset.checked_add(len) {
            Some(end) if end <= self.length => end,
            _ => return false,
        };

        dst[..len].copy_from_slice(&self.as_slice()[offset..end]);
        true
    }

    fn release(&mut self, zero: bool) {
        if let Some(mut old) = self.storage.take() {
            if zero {
                checksum::zero(&mut old);
            }
        }
    }
}

impl Clone for ByteBuffer {
    /// Deep copy of the valid bytes; slack capacity is not carried over.
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }
}

impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ByteBuffer {}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Index<usize> for ByteBuffer {
    type Output = u8;

    /// Panics if `index >= length`.
    fn index(&self, index: usize) -> &u8 {
        &self.as_slice()[index]
    }
}

impl IndexMut<usize> for ByteBuffer {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.as_mut_slice()[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unallocated() {
        let buf = ByteBuffer::new();
        assert_eq!(buf.length(), 0);
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_allocated());
        assert!(buf.as_slice().is_empty());
        assert!(buf.slice_from(0).is_none());
        assert!(buf.idx_of(&[1, 2]).is_none());
    }

    #[test]
    fn test_with_length_zeroed() {
        let buf = ByteBuffer::with_length(5);
        assert_eq!(buf.length(), 5);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.as_slice(), &[0; 5]);
    }

    #[test]
    fn test_resize_within_capacity_keeps_allocation() {
        let mut buf = ByteBuffer::from_slice(&[1, 2, 3, 4, 5, 6]);
        buf.resize(2, false);
        assert_eq!(buf.length(), 2);
        assert_eq!(buf.capacity(), 6);
        assert_eq!(buf.as_slice(), &[1, 2]);

        // Growing back within capacity exposes the retained bytes
        buf.resize(6, false);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_resize_grow_with_copy_preserves_data() {
        let mut buf = ByteBuffer::from_slice(&[9, 8, 7]);
        buf.resize(10, true);
        assert_eq!(buf.length(), 10);
        assert_eq!(buf.capacity(), 10);
        assert_eq!(&buf.as_slice()[..3], &[9, 8, 7]);
    }

    #[test]
    fn test_resize_grow_without_copy_discards_data() {
        let mut buf = ByteBuffer::from_slice(&[9, 8, 7]);
        buf.resize(10, false);
        assert_eq!(buf.length(), 10);
        assert_eq!(&buf.as_slice()[..3], &[0, 0, 0]);
    }

    #[test]
    fn test_resize_zero_on_unallocated_allocates() {
        let mut buf = ByteBuffer::new();
        buf.resize(0, false);
        assert!(buf.is_allocated());
        assert_eq!(buf.length(), 0);
    }

    #[test]
    fn test_allocate_does_not_change_length() {
        let mut buf = ByteBuffer::from_slice(&[1, 2, 3]);
        buf.allocate(64, true, false);
        assert_eq!(buf.length(), 3);
        assert_eq!(buf.capacity(), 64);
        assert_eq!(buf.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_allocate_below_length_is_noop() {
        let mut buf = ByteBuffer::from_slice(&[1, 2, 3, 4]);
        buf.allocate(2, true, true);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_allocate_without_copy() {
        let mut buf = ByteBuffer::from_slice(&[1, 2, 3]);
        buf.allocate(8, false, true);
        assert_eq!(buf.length(), 3);
        assert_eq!(buf.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn test_reclaim() {
        let mut buf = ByteBuffer::with_length(100);
        buf.copy_from(&[1, 2, 3]);
        buf.resize(3, true);
        assert_eq!(buf.capacity(), 100);

        buf.reclaim(true);
        assert_eq!(buf.capacity(), 3);
        assert_eq!(buf.as_slice(), &[1, 2, 3]);

        // Already tight
        buf.reclaim(false);
        assert_eq!(buf.capacity(), 3);
    }

    #[test]
    fn test_clear_and_dispose() {
        let mut buf = ByteBuffer::from_slice(&[1, 2, 3]);
        buf.clear(true);
        assert_eq!(buf.length(), 0);
        assert_eq!(buf.capacity(), 3);

        // Wiped: growing back within capacity shows zeros
        buf.resize(3, true);
        assert_eq!(buf.as_slice(), &[0, 0, 0]);

        buf.dispose(true);
        assert!(!buf.is_allocated());
        assert_eq!(buf.length(), 0);
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn test_clear_without_zero_keeps_bytes() {
        let mut buf = ByteBuffer::from_slice(&[4, 5, 6]);
        buf.clear(false);
        buf.resize(3, true);
        assert_eq!(buf.as_slice(), &[4, 5, 6]);

        buf.clear(true);
        buf.resize(2, true);
        assert_eq!(buf.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_copy_from_at_grows() {
        let mut buf = ByteBuffer::from_slice(&[1, 2, 3]);
        assert!(buf.copy_from_at(&[7, 8, 9, 10], 2));
        assert_eq!(buf.as_slice(), &[1, 2, 7, 8, 9, 10]);
    }

    #[test]
    fn test_copy_from_at_end_appends() {
        let mut buf = ByteBuffer::from_slice(&[1, 2]);
        assert!(buf.copy_from_at(&[3], 2));
        assert_eq!(buf.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_copy_from_into_empty_buffer() {
        let mut buf = ByteBuffer::new();
        assert!(buf.copy_from(&[4, 5]));
        assert_eq!(buf.as_slice(), &[4, 5]);
    }

    #[test]
    fn test_copy_from_invalid_is_noop() {
        let mut buf = ByteBuffer::from_slice(&[1, 2, 3]);
        assert!(!buf.copy_from_at(&[], 0));
        assert!(!buf.copy_from_at(&[9], 4));
        assert_eq!(buf.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_copy_to() {
        let buf = ByteBuffer::from_slice(&[1, 2, 3, 4]);

        let mut all = [0u8; 4];
        assert!(buf.copy_to(&mut all, 0));
        assert_eq!(all, [1, 2, 3, 4]);

        let mut two = [0u8; 2];
        assert!(buf.copy_to_at(&mut two, 2, 2));
        assert_eq!(two, [3, 4]);
    }

    #[test]
    fn test_copy_to_invalid_is_noop() {
        let buf = ByteBuffer::from_slice(&[1, 2, 3, 4]);
        let mut dst = [0xEEu8; 8];

        assert!(!buf.copy_to(&mut dst, 5)); // longer than buffer
        assert!(!buf.copy_to_at(&mut dst, 1, 4)); // offset out of range
        assert!(!buf.copy_to_at(&mut dst, 3, 2)); // runs past end
        assert!(!buf.copy_to_at(&mut dst[..1], 2, 0)); // destination too short
        assert_eq!(dst, [0xEE; 8]);
    }

    #[test]
    fn test_slice_from_and_idx_of() {
        let buf = ByteBuffer::from_slice(&[10, 20, 30, 40]);
        let tail = buf.slice_from(2).unwrap();
        assert_eq!(tail, &[30, 40]);
        assert_eq!(buf.idx_of(tail), Some(2));
        assert_eq!(buf.slice_from(4), Some(&[][..]));
        assert!(buf.slice_from(5).is_none());
        assert_eq!(buf.end(), 4);

        let other = [0u8; 4];
        assert!(buf.idx_of(&other).is_none());
    }

    #[test]
    fn test_index_and_get() {
        let mut buf = ByteBuffer::from_slice(&[1, 2, 3]);
        buf[1] = 42;
        assert_eq!(buf[1], 42);
        assert_eq!(buf.get(2), Some(3));
        assert_eq!(buf.get(3), None);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let buf = ByteBuffer::from_slice(&[1, 2, 3]);
        let _ = buf[3];
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original = ByteBuffer::with_length(16);
        original.copy_from(&[1, 2, 3]);
        original.resize(3, true);

        let mut copy = original.clone();
        copy[0] = 99;

        assert_eq!(original.as_slice(), &[1, 2, 3]);
        assert_eq!(copy.as_slice(), &[99, 2, 3]);
        assert_eq!(copy.capacity(), 3);
    }
}
