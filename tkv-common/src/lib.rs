// tkv-common - Shared helpers for the TinyKV client
//
// This crate holds the pure parsing helpers and synchronization primitives
// used by the client library and the command-line application.

pub mod duration;
pub mod size;
pub mod sync;

// Re-export for convenience
pub use duration::*;
pub use size::*;
pub use sync::*;
