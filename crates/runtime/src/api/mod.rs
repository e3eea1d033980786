//! Public runtime API surface.
//!
//! Types exposed to consumers of the runtime crate, kept apart from the
//! worker and event plumbing.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::RuntimeHandle;
