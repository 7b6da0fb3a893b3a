//! Error surface of the wire codec.
//!
//! Kept small and framework-free at this layer: every decode failure is one
//! of a handful of malformed-frame shapes, plus the underlying I/O error when
//! the byte source itself fails mid-frame.

use std::fmt;
use std::io;
use std::string::FromUtf8Error;

/// Convenience result alias for codec operations.
pub type WireResult<T, E = WireError> = Result<T, E>;

#[derive(Debug)]
/// Errors surfaced while encoding or decoding a command frame.
pub enum WireError {
    /// The frame opens with a kind tag no command maps to.
    UnknownTag(u8),
    /// The payload presence flag is neither `0x00` nor `0x01`.
    BadPresenceFlag(u8),
    /// The declared payload length exceeds the frame cap.
    PayloadTooLarge { len: usize, max: usize },
    /// A shutdown frame names a mode other than `EXIT` or `KILL`.
    BadShutdownMode(String),
    /// The byte source ended in the middle of a frame.
    Truncated,
    /// Payload bytes are not valid UTF-8.
    Utf8(FromUtf8Error),
    /// The byte source failed with a non-EOF I/O error.
    Io(io::Error),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::UnknownTag(tag) => {
                write!(f, "unrecognized command tag 0x{tag:02X}")
            }
            WireError::BadPresenceFlag(flag) => {
                write!(f, "payload presence flag 0x{flag:02X} is not 0 or 1")
            }
            WireError::PayloadTooLarge { len, max } => {
                write!(f, "declared payload length {len} exceeds the {max} byte cap")
            }
            WireError::BadShutdownMode(name) => {
                write!(f, "shutdown frame mode {name:?} is not EXIT or KILL")
            }
            WireError::Truncated => {
                write!(f, "byte source ended mid-frame")
            }
            WireError::Utf8(err) => {
                write!(f, "payload is not valid UTF-8: {err}")
            }
            WireError::Io(err) => {
                write!(f, "byte source failed: {err}")
            }
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WireError::Utf8(err) => Some(err),
            WireError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for WireError {
    fn from(err: io::Error) -> Self {
        // An EOF inside `read_exact` means the stream stopped mid-frame.
        if err.kind() == io::ErrorKind::UnexpectedEof {
            WireError::Truncated
        } else {
            WireError::Io(err)
        }
    }
}

impl From<FromUtf8Error> for WireError {
    fn from(err: FromUtf8Error) -> Self {
        WireError::Utf8(err)
    }
}
