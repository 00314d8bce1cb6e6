//! Checksum and byte-order primitives.
//!
//! CRC8 is the Dallas/Maxim 1-Wire CRC (AVR `_crc_ibutton_update`:
//! reflected polynomial 0x8C, seed 0x00). CRC16 is the AVR `_crc16_update`
//! CRC (reflected polynomial 0xA001, seed 0xFFFF), i.e. CRC-16/MODBUS.
//!
//! Both functions are incremental: the value returned by one call can be
//! passed as the seed of the next call to continue over more data.

use crc::{Crc, CRC_16_MODBUS, CRC_8_MAXIM_DOW};
use zeroize::Zeroize;

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_MAXIM_DOW);
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Initial CRC8 seed.
pub const CRC8_SEED: u8 = 0x00;

/// Initial CRC16 seed.
pub const CRC16_SEED: u16 = 0xFFFF;

/// Returns the value to seed a fresh CRC8 computation with.
pub const fn crc8_seed() -> u8 {
    CRC8_SEED
}

/// Returns the value to seed a fresh CRC16 computation with.
pub const fn crc16_seed() -> u16 {
    CRC16_SEED
}

/// Continues a CRC8 computation from `seed` over `data`.
///
/// An empty `data` returns `seed` unchanged.
pub fn crc8(seed: u8, data: &[u8]) -> u8 {
    if data.is_empty() {
        return seed;
    }
    // Both algorithms are reflected with no final xor, so the register
    // equals the output; digest_with_initial reflects its argument.
    let mut digest = CRC8.digest_with_initial(seed.reverse_bits());
    digest.update(data);
    digest.finalize()
}

/// Continues a CRC16 computation from `seed` over `data`.
///
/// An empty `data` returns `seed` unchanged.
pub fn crc16(seed: u16, data: &[u8]) -> u16 {
    if data.is_empty() {
        return seed;
    }
    let mut digest = CRC16.digest_with_initial(seed.reverse_bits());
    digest.update(data);
    digest.finalize()
}

/// Host to network byte order.
#[inline]
pub const fn hton16(value: u16) -> u16 {
    value.to_be()
}

#[inline]
pub const fn hton32(value: u32) -> u32 {
    value.to_be()
}

#[inline]
pub const fn hton64(value: u64) -> u64 {
    value.to_be()
}

/// Network to host byte order.
#[inline]
pub const fn ntoh16(value: u16) -> u16 {
    u16::from_be(value)
}

#[inline]
pub const fn ntoh32(value: u32) -> u32 {
    u32::from_be(value)
}

#[inline]
pub const fn ntoh64(value: u64) -> u64 {
    u64::from_be(value)
}

/// Overwrites every byte of `data` with zero.
///
/// The writes are not elided even when the memory is released right
/// afterwards.
pub fn zero(data: &mut [u8]) {
    data.zeroize();
}
