// travelcard/src/protocol/bits.rs

//! EN 1545 bit-level field access.
//!
//! Fields are packed big-endian, most significant bit first within each
//! byte, and are addressed either by absolute bit offset or by a
//! `(byte, bit)` pair meaning `byte * 8 + bit`.

use chrono::{NaiveDate, NaiveTime};
use log::debug;

use crate::constants::{EN1545_DATE_BITS, EN1545_TIME_BITS};
use crate::utils::time::{add_days, helsinki_local, LocalDateTime};
use crate::{Error, Result};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Day zero of EN 1545 date stamps.
pub fn en1545_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1997, 1, 1).unwrap_or_default()
}

/// Read `bit_count` (at most 32) bits starting at `bit_offset`.
///
/// # Panics
///
/// Panics if `bit_offset` lies outside `buf` or `bit_count` exceeds 32.
/// A field that starts inside the buffer but runs past its end is truncated
/// to the bits that are available.
pub fn read_bits(buf: &[u8], bit_offset: usize, bit_count: usize) -> u32 {
    let total = buf.len() * 8;
    assert!(bit_count <= 32, "cannot read {} bits into a u32", bit_count);
    assert!(
        bit_offset < total,
        "bit offset {} outside a {}-byte buffer",
        bit_offset,
        buf.len()
    );

    let mut count = bit_count;
    if bit_offset + count > total {
        debug!(
            "truncating {}-bit read at offset {} to {} bits",
            bit_count,
            bit_offset,
            total - bit_offset
        );
        count = total - bit_offset;
    }

    let mut offset = bit_offset;
    let mut out: u32 = 0;

    // Leading partial byte
    while count > 0 && offset % 8 != 0 {
        out = (out << 1) | ((buf[offset / 8] >> (7 - offset % 8)) & 1) as u32;
        offset += 1;
        count -= 1;
    }
    // Whole bytes
    while count >= 8 {
        out = (out << 8) | buf[offset / 8] as u32;
        offset += 8;
        count -= 8;
    }
    // Trailing partial byte
    while count > 0 {
        out = (out << 1) | ((buf[offset / 8] >> (7 - offset % 8)) & 1) as u32;
        offset += 1;
        count -= 1;
    }
    out
}

/// Fallible variant of [`read_bits`] that requires the whole field to fit.
pub fn checked_read_bits(buf: &[u8], bit_offset: usize, bit_count: usize) -> Result<u32> {
    let needed_bits = bit_offset + bit_count;
    if bit_count > 32 || needed_bits > buf.len() * 8 {
        return Err(Error::InvalidLength {
            expected: needed_bits.div_ceil(8),
            actual: buf.len(),
        });
    }
    if bit_count == 0 {
        return Ok(0);
    }
    Ok(read_bits(buf, bit_offset, bit_count))
}

pub fn read_bits_at(buf: &[u8], byte: usize, bit: usize, bit_count: usize) -> u32 {
    read_bits(buf, byte * 8 + bit, bit_count)
}

/// 14-bit day count since 1997-01-01.
pub fn read_date(buf: &[u8], bit_offset: usize) -> NaiveDate {
    let days = read_bits(buf, bit_offset, EN1545_DATE_BITS);
    add_days(en1545_epoch(), days as u64)
}

pub fn read_date_at(buf: &[u8], byte: usize, bit: usize) -> NaiveDate {
    read_date(buf, byte * 8 + bit)
}

/// 11-bit minute count since midnight. Values past 23:59 wrap.
pub fn read_time(buf: &[u8], bit_offset: usize) -> NaiveTime {
    let minutes = read_bits(buf, bit_offset, EN1545_TIME_BITS) % MINUTES_PER_DAY;
    NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0).unwrap_or(NaiveTime::MIN)
}

pub fn read_time_at(buf: &[u8], byte: usize, bit: usize) -> NaiveTime {
    read_time(buf, byte * 8 + bit)
}

/// Date and time fields combined into a Helsinki local timestamp.
pub fn read_date_time(buf: &[u8], date_offset: usize, time_offset: usize) -> LocalDateTime {
    let date = read_date(buf, date_offset);
    let time = read_time(buf, time_offset);
    helsinki_local(date.and_time(time))
}

pub fn read_date_time_at(
    buf: &[u8],
    date_byte: usize,
    date_bit: usize,
    time_byte: usize,
    time_bit: usize,
) -> LocalDateTime {
    read_date_time(buf, date_byte * 8 + date_bit, time_byte * 8 + time_bit)
}
