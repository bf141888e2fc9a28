// travelcard/src/protocol/mod.rs

pub mod apdu;
pub mod area;
pub mod bits;
pub mod block;

pub use apdu::{Apdu, ApduResponse};
pub use area::{decode_area, decode_area_at, decode_area_type, AreaCode, AreaType};
pub use bits::{
    checked_read_bits, read_bits, read_bits_at, read_date, read_date_at, read_date_time,
    read_date_time_at, read_time, read_time_at,
};
pub use block::{RawBlock, SizeConstraint};
