use command_wire::{CommandKind, WireError};
use thiserror::Error;

pub type FabricResult<T> = Result<T, FabricError>;

#[derive(Debug, Error)]
pub enum FabricError {
    /// A producer capability was asked to issue a kind outside its role.
    /// Always a programming error on the calling side.
    #[error("command kind {kind:?} is outside the {role} role")]
    UnsupportedForRole {
        role: &'static str,
        kind: CommandKind,
    },

    /// `take_next` found neither a targeted nor a latched command. Expected
    /// whenever a take is probed without a preceding successful wait.
    #[error("no command is available to take")]
    Exhausted,

    /// The channel was removed from the registry; no further commands will
    /// arrive and blocked waiters have been released.
    #[error("command channel is closed")]
    Closed,

    #[error("wire error: {0}")]
    Wire(#[from] WireError),
}
