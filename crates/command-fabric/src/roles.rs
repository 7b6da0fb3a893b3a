//! Restricted producer capabilities.
//!
//! Instead of one producer object with runtime role checks, the fabric hands
//! out two narrow capability types over the same signaling primitives: the
//! broadcast role can only latch standing commands across all channels, the
//! immediate role can only queue one-shot commands on its addressed channel.
//! Misusing the named methods is unrepresentable; the checked
//! [`dispatch`](BroadcastCommands::dispatch) entry points exist for callers
//! whose command kind is chosen at runtime and reject out-of-role kinds.

use std::sync::Arc;

use command_wire::{Command, CommandKind, ShutdownMode};

use crate::channel::CommandChannel;
use crate::error::{FabricError, FabricResult};
use crate::registry::RegistryShared;

/// Broadcast ("cachable") producer: standing, idempotent directives recorded
/// in the log and latched onto every current and future channel.
#[derive(Clone)]
pub struct BroadcastCommands {
    registry: Arc<RegistryShared>,
}

impl BroadcastCommands {
    pub(crate) fn new(registry: Arc<RegistryShared>) -> Self {
        Self { registry }
    }

    /// Latches "skip every test not yet started" onto all workers.
    pub fn request_skip_remaining(&self) {
        self.registry.fan_out(Command::skip_remaining());
    }

    /// Latches a shutdown in the given mode onto all workers.
    pub fn request_shutdown(&self, mode: ShutdownMode) {
        self.registry.fan_out(Command::shutdown(mode));
    }

    /// Checked entry point for a runtime-chosen command. Kinds that are not
    /// meaningful as standing, replayable conditions are rejected.
    pub fn dispatch(&self, cmd: Command) -> FabricResult<()> {
        match cmd.kind() {
            CommandKind::SkipRemaining | CommandKind::Shutdown => {
                self.registry.fan_out(cmd);
                Ok(())
            }
            kind => Err(FabricError::UnsupportedForRole {
                role: "broadcast",
                kind,
            }),
        }
    }
}

/// Targeted ("immediate") producer: one-shot directives queued on a single
/// addressed channel, never replayed.
#[derive(Clone)]
pub struct ImmediateCommands {
    channel: CommandChannel,
}

impl ImmediateCommands {
    pub(crate) fn new(channel: CommandChannel) -> Self {
        Self { channel }
    }

    /// Queues a keep-alive on the addressed worker.
    pub fn noop(&self) {
        self.channel.signal_targeted(Command::noop());
    }

    /// Queues a shutdown in the given mode on the addressed worker,
    /// preempting any latched broadcast state.
    pub fn request_shutdown(&self, mode: ShutdownMode) {
        self.channel.signal_targeted(Command::shutdown(mode));
    }

    /// Checked entry point for a runtime-chosen command. Standing conditions
    /// and worker-side acknowledgements are rejected.
    pub fn dispatch(&self, cmd: Command) -> FabricResult<()> {
        match cmd.kind() {
            CommandKind::Noop | CommandKind::Shutdown => {
                self.channel.signal_targeted(cmd);
                Ok(())
            }
            kind => Err(FabricError::UnsupportedForRole {
                role: "immediate",
                kind,
            }),
        }
    }
}
