// travelcard/src/lib.rs

//! travelcard
//!
//! Reader and decoder for HSL and Nysse contactless travel cards.
//!
//! The crate is split the same way a read flows through it: a
//! [`dispatch::Dispatcher`] probes a tag with one [`card::CardDriver`] per
//! card family, the winning driver hands its raw blocks back as a field map,
//! and the [`records`] decoders turn those blocks into typed tickets, passes,
//! balances and trip history using the EN 1545 helpers in [`protocol`].
#![warn(missing_docs)]

pub mod card;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod prelude;
pub mod protocol;
pub mod records;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
