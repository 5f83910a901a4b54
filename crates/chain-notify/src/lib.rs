//! # `chain-notify`
//!
//! `chain-notify` delivers in-process notifications of newly connected source-chain blocks to the
//! subsystems that consume them.
//!
//! The upstream full node feed publishes each accepted block exactly once through a [`feed::BlockFeed`];
//! every subscriber observes the blocks in publish order through its own [`subscription::Subscription`]
//! stream. Strictly sequential per-subscriber delivery is what lets downstream consumers process
//! blocks one at a time, in chain order.

pub mod feed;
pub mod subscription;
