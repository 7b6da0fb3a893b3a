//! Per-worker command channels, producer roles, and the channel registry.
//!
//! The fabric sits between an orchestrator issuing control commands and the
//! worker processes consuming them:
//! * [`CommandChannel`] – blocking per-worker channel with a two-step
//!   wait/take contract and an `io::Read` view over encoded frames.
//! * [`BroadcastCommands`] / [`ImmediateCommands`] – the two restricted
//!   producer capabilities (latched fan-out vs addressed one-shot).
//! * [`ChannelRegistry`] – creates, tracks, and removes channels; owns the
//!   append-only broadcast log that seeds late-created channels.
//!
//! Wiring a channel's bytes onto a real pipe or socket, and spawning the
//! worker on the other end, are the caller's concern.

mod broadcast;
mod channel;
mod error;
mod registry;
mod roles;

pub use broadcast::LogObserver;
pub use channel::{ChannelReader, CommandChannel};
pub use error::{FabricError, FabricResult};
pub use registry::ChannelRegistry;
pub use roles::{BroadcastCommands, ImmediateCommands};
