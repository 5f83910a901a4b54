//! This crate contains the shared data model for the federation gateway monitor: deposit and
//! withdrawal records, chained-block types and the gateway settings.
//!
//! It is not intended to be used directly by end users, but rather to be used as a dependency by
//! other crates. Also note that this crate lies at the bottom of the crate-hierarchy in this
//! workspace i.e., it does not depend on any other crate in this workspace.

pub mod block;
pub mod deposit;
pub mod settings;
pub mod types;
pub mod withdrawal;
