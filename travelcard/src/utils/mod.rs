//! Small, reusable helpers used across the crate: hex conversion for field
//! maps and logging, and Finnish local time handling for validity math.

pub mod hex;
pub mod time;

// Re-export the most common helpers at the `utils` module level so callers can
// use `crate::utils::bytes_to_hex(...)` etc if they prefer.
pub use hex::*;
pub use time::*;
