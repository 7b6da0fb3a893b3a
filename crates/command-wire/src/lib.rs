//! Command value model and framed wire codec for orchestrator→worker control.
//!
//! This crate holds the pieces shared by both ends of a worker control pipe:
//! * [`Command`] – immutable kind/payload pair understood by workers.
//! * [`encode`] / [`decode`] – one self-delimiting frame per command.
//! * [`WireError`] – lightweight error surface for malformed frames.
//!
//! The crate is deliberately free of framework dependencies; everything that
//! blocks, locks, or logs lives one layer up in `command-fabric`.

mod codec;
mod command;
mod error;

pub use codec::{
    decode, encode, encode_to_vec, MAX_PAYLOAD_LEN, TAG_ACK_BYE, TAG_NOOP, TAG_RUN_NEXT_TEST,
    TAG_SHUTDOWN, TAG_SKIP_REMAINING,
};
pub use command::{Command, CommandKind, ShutdownMode};
pub use error::{WireError, WireResult};
