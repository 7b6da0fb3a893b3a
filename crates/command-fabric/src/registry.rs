//! Registry of live worker channels.
//!
//! One registry exists per orchestration run. It owns the broadcast log and
//! the set of tracked channels, and hands out the two producer capabilities.
//! Membership changes and broadcast fan-out contend on a single lock, which
//! is held across the log append plus fan-out so a concurrently created
//! channel observes each broadcast exactly once (via its seed replay or via
//! the fan-out, never both).

use std::sync::Arc;

use command_wire::Command;
use log::debug;
use parking_lot::Mutex;

use crate::broadcast::{BroadcastLog, LogObserver};
use crate::channel::CommandChannel;
use crate::roles::{BroadcastCommands, ImmediateCommands};

pub(crate) struct RegistryShared {
    log: BroadcastLog,
    channels: Mutex<Vec<CommandChannel>>,
}

impl RegistryShared {
    pub(crate) fn fan_out(&self, cmd: Command) {
        let channels = self.channels.lock();
        self.log.append(cmd.clone());
        debug!(
            "broadcast {:?} fanned out to {} channel(s)",
            cmd.kind(),
            channels.len()
        );
        for channel in channels.iter() {
            channel.signal_broadcast(cmd.clone());
        }
    }
}

/// Creates, tracks, and removes per-worker command channels.
pub struct ChannelRegistry {
    shared: Arc<RegistryShared>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(RegistryShared {
                log: BroadcastLog::default(),
                channels: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Builds and tracks a new channel, replaying the broadcast log through
    /// the normal latch path so a worker spawned after a broadcast still
    /// receives it (duplicate kinds in the log collapse onto one latch).
    pub fn create_channel(&self) -> CommandChannel {
        let mut channels = self.shared.channels.lock();
        let channel = CommandChannel::new();
        for cmd in self.shared.log.snapshot() {
            channel.signal_broadcast(cmd);
        }
        channels.push(channel.clone());
        debug!("channel created, {} tracked", channels.len());
        channel
    }

    /// Stops tracking `channel` and closes it: pending items are discarded
    /// and blocked consumers are released. Removing an untracked channel is
    /// a no-op beyond (re-)closing it.
    pub fn remove_channel(&self, channel: &CommandChannel) {
        let mut channels = self.shared.channels.lock();
        let before = channels.len();
        channels.retain(|c| !c.same_channel(channel));
        let removed = before - channels.len();
        drop(channels);
        channel.close();
        debug!("channel removed ({removed} untracked)");
    }

    /// The broadcast ("cachable") producer capability.
    pub fn broadcast(&self) -> BroadcastCommands {
        BroadcastCommands::new(Arc::clone(&self.shared))
    }

    /// The targeted ("immediate") producer capability, addressed to one
    /// specific channel. Immediate commands do not fan out.
    pub fn immediate(&self, channel: &CommandChannel) -> ImmediateCommands {
        ImmediateCommands::new(channel.clone())
    }

    /// A fresh cursor over the broadcast log, starting at its beginning and
    /// reflecting entries appended after observation begins.
    pub fn observe_log(&self) -> LogObserver {
        self.shared.log.observer()
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
