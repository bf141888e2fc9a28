// travelcard/src/transport/mod.rs

pub mod cancel;
pub mod lock;
pub mod mock;
pub mod traits;

pub use cancel::CancelToken;
pub use lock::TagLock;
pub use mock::MockTransport;
pub use traits::{TagState, Transport, TransportEvent};
