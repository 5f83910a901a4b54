//! Shared service plumbing for the federation gateway: logging and tracing setup.

pub mod logging;

// Re-export tracing crate for convenience.
pub use tracing;
