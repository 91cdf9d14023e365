pub mod error;
pub mod instrument;
pub mod mock_port;
pub mod transport;

// Re-export the primary types so users can depend on the crate
// without knowing the internal module layout.
pub use error::{Error, Result};
pub use instrument::*;
