// fixtures.rs — card payloads built field by field

use chrono::NaiveDate;
use travelcard::constants::*;
use travelcard::utils::time::{helsinki_local, LocalDateTime};

/// MSB-first bit writer, the inverse of the EN 1545 reader.
pub fn write_bits(buf: &mut [u8], offset: usize, count: usize, value: u32) {
    for i in 0..count {
        let bit = (value >> (count - 1 - i)) & 1;
        let pos = offset + i;
        let mask = 0x80u8 >> (pos % 8);
        if bit == 1 {
            buf[pos / 8] |= mask;
        } else {
            buf[pos / 8] &= !mask;
        }
    }
}

pub fn put(buf: &mut [u8], byte: usize, bit: usize, count: usize, value: u32) {
    write_bits(buf, byte * 8 + bit, count, value);
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn noon(date: NaiveDate) -> LocalDateTime {
    helsinki_local(date.and_hms_opt(12, 0, 0).unwrap())
}

/// Days since 1997-01-01.
pub fn en1545_day(date: NaiveDate) -> u32 {
    (date - day(1997, 1, 1)).num_days() as u32
}

/// Days since 1900-01-01.
pub fn nysse_day(date: NaiveDate) -> u16 {
    (date - day(1900, 1, 1)).num_days() as u16
}

pub fn hsl_app_info() -> Vec<u8> {
    vec![0x30, 0x92, 0x46, 0x20, 0x00, 0x12, 0x34, 0x56, 0x78, 0x90, 0x50]
}

/// Slot A in zone ABC, slot B in zone AB; B was loaded last.
pub fn hsl_period_pass(a: (NaiveDate, NaiveDate), b: (NaiveDate, NaiveDate)) -> Vec<u8> {
    let mut buf = vec![0u8; HSL_PERIOD_PASS_LEN];
    put(&mut buf, 1, 7, 2, 2);
    put(&mut buf, 2, 1, 6, 5);
    put(&mut buf, 2, 7, 14, en1545_day(a.0));
    put(&mut buf, 4, 5, 14, en1545_day(a.1));
    put(&mut buf, 8, 7, 2, 2);
    put(&mut buf, 9, 1, 6, 0);
    put(&mut buf, 9, 7, 14, en1545_day(b.0));
    put(&mut buf, 11, 5, 14, en1545_day(b.1));
    put(&mut buf, 15, 7, 14, en1545_day(day(2024, 1, 10)));
    put(&mut buf, 17, 5, 11, 10 * 60 + 30);
    put(&mut buf, 19, 0, 9, 29);
    put(&mut buf, 20, 1, 20, 6480);
    buf
}

pub fn hsl_stored_value(cents: u32) -> Vec<u8> {
    let mut buf = vec![0u8; HSL_STORED_VALUE_LEN];
    put(&mut buf, 0, 0, 20, cents);
    buf
}

/// Two-person 80 minute AB ticket bought 2024-01-15 08:00.
pub fn hsl_eticket() -> Vec<u8> {
    let mut b = vec![0u8; HSL_ETICKET_LEN];
    let d = en1545_day(day(2024, 1, 15));
    put(&mut b, 4, 7, 2, 2);
    put(&mut b, 5, 1, 2, 0);
    put(&mut b, 5, 3, 8, 80);
    put(&mut b, 7, 5, 2, 2);
    put(&mut b, 7, 7, 6, 0);
    put(&mut b, 13, 1, 14, 280);
    put(&mut b, 14, 7, 14, 250);
    put(&mut b, 16, 5, 6, 2);
    put(&mut b, 25, 5, 14, d);
    put(&mut b, 27, 3, 11, 8 * 60);
    put(&mut b, 28, 6, 14, d);
    put(&mut b, 30, 4, 11, 9 * 60 + 20);
    put(&mut b, 35, 6, 14, d);
    put(&mut b, 37, 4, 11, 8 * 60 + 2);
    put(&mut b, 38, 7, 14, 1234);
    put(&mut b, 42, 6, 2, 1);
    put(&mut b, 43, 0, 6, 7);
    b
}

pub fn hsl_history_entry(purchase: bool, date: NaiveDate, minutes: u32, price: u32, remaining: u32) -> Vec<u8> {
    let mut e = vec![0u8; HSL_HISTORY_ENTRY_LEN];
    write_bits(&mut e, 0, 1, purchase as u32);
    write_bits(&mut e, 1, 14, en1545_day(date));
    write_bits(&mut e, 15, 11, minutes);
    put(&mut e, 6, 3, 14, price);
    put(&mut e, 8, 1, 6, 1);
    put(&mut e, 8, 7, 20, remaining);
    e
}

pub fn nysse_owner(name: &[u8]) -> Vec<u8> {
    let mut b = vec![0u8; NYSSE_OWNER_INFO_LEN];
    b[6..6 + name.len()].copy_from_slice(name);
    b
}

/// Two slots; the first is newer and holds a season ending on `end`.
pub fn nysse_season_pass(end: NaiveDate) -> Vec<u8> {
    let mut b = vec![0u8; NYSSE_SEASON_PASS_LEN];
    b[0] = 9;
    b[6] = 3;
    b[10..12].copy_from_slice(&nysse_day(end).to_be_bytes());
    b[48] = 8;
    b
}

pub fn nysse_history_entry(date: NaiveDate, code: u32, minutes: u16, amount: u16) -> Vec<u8> {
    let mut e = vec![0u8; NYSSE_HISTORY_ENTRY_LEN];
    e[0..2].copy_from_slice(&nysse_day(date).to_le_bytes());
    e[2..6].copy_from_slice(&code.to_be_bytes());
    e[6..8].copy_from_slice(&(minutes * 2).to_le_bytes());
    e[8..10].copy_from_slice(&amount.to_le_bytes());
    e
}

pub fn nysse_balance(cents: u32) -> Vec<u8> {
    cents.to_le_bytes().to_vec()
}
