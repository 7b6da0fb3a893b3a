//! Framed, self-delimiting codec for [`Command`] values.
//!
//! Frame layout, in order:
//!
//! ```text
//! [kind tag: 1 byte][has_payload: 1 byte][payload len: u32 LE][payload: UTF-8]
//! ```
//!
//! The length prefix and payload are present only when `has_payload` is 1.
//! The codec is stateless: encode and decode are free functions over any
//! writer or reader, and a decode failure never consumes more bytes than the
//! frame it was parsing.

use std::io::{Read, Write};

use crate::command::{Command, CommandKind, ShutdownMode};
use crate::error::{WireError, WireResult};

/// Tag byte for [`CommandKind::Noop`].
pub const TAG_NOOP: u8 = 0x01;
/// Tag byte for [`CommandKind::RunNextTest`].
pub const TAG_RUN_NEXT_TEST: u8 = 0x02;
/// Tag byte for [`CommandKind::SkipRemaining`].
pub const TAG_SKIP_REMAINING: u8 = 0x03;
/// Tag byte for [`CommandKind::Shutdown`].
pub const TAG_SHUTDOWN: u8 = 0x04;
/// Tag byte for [`CommandKind::AckBye`].
pub const TAG_ACK_BYE: u8 = 0x05;

/// Largest payload a frame may declare; longer length prefixes are treated
/// as malformed.
pub const MAX_PAYLOAD_LEN: usize = 64 * 1024;

fn kind_tag(kind: CommandKind) -> u8 {
    match kind {
        CommandKind::Noop => TAG_NOOP,
        CommandKind::RunNextTest => TAG_RUN_NEXT_TEST,
        CommandKind::SkipRemaining => TAG_SKIP_REMAINING,
        CommandKind::Shutdown => TAG_SHUTDOWN,
        CommandKind::AckBye => TAG_ACK_BYE,
    }
}

fn tag_kind(tag: u8) -> Option<CommandKind> {
    match tag {
        TAG_NOOP => Some(CommandKind::Noop),
        TAG_RUN_NEXT_TEST => Some(CommandKind::RunNextTest),
        TAG_SKIP_REMAINING => Some(CommandKind::SkipRemaining),
        TAG_SHUTDOWN => Some(CommandKind::Shutdown),
        TAG_ACK_BYE => Some(CommandKind::AckBye),
        _ => None,
    }
}

/// Writes exactly one frame for `cmd` into `out`.
pub fn encode(cmd: &Command, out: &mut impl Write) -> WireResult<()> {
    out.write_all(&[kind_tag(cmd.kind())])?;
    match cmd.payload() {
        Some(payload) => {
            let bytes = payload.as_bytes();
            if bytes.len() > MAX_PAYLOAD_LEN {
                return Err(WireError::PayloadTooLarge {
                    len: bytes.len(),
                    max: MAX_PAYLOAD_LEN,
                });
            }
            out.write_all(&[1])?;
            out.write_all(&(bytes.len() as u32).to_le_bytes())?;
            out.write_all(bytes)?;
        }
        None => out.write_all(&[0])?,
    }
    Ok(())
}

/// Encodes `cmd` into a freshly allocated frame buffer.
pub fn encode_to_vec(cmd: &Command) -> WireResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(2 + cmd.payload().map_or(0, |p| 4 + p.len()));
    encode(cmd, &mut buf)?;
    Ok(buf)
}

/// Reads exactly one frame from `input` and returns the decoded command.
///
/// Fails with a [`WireError`] when the tag is unrecognized, the presence flag
/// or payload is malformed, or the source ends mid-frame. A shutdown frame
/// must name a known [`ShutdownMode`]; it is rebuilt through
/// [`Command::shutdown`] so decoded commands stay canonical.
pub fn decode(input: &mut impl Read) -> WireResult<Command> {
    let mut tag = [0u8; 1];
    input.read_exact(&mut tag)?;
    let kind = tag_kind(tag[0]).ok_or(WireError::UnknownTag(tag[0]))?;

    let mut flag = [0u8; 1];
    input.read_exact(&mut flag)?;
    let payload = match flag[0] {
        0 => None,
        1 => {
            let mut len_bytes = [0u8; 4];
            input.read_exact(&mut len_bytes)?;
            let len = u32::from_le_bytes(len_bytes) as usize;
            if len > MAX_PAYLOAD_LEN {
                return Err(WireError::PayloadTooLarge {
                    len,
                    max: MAX_PAYLOAD_LEN,
                });
            }
            let mut bytes = vec![0u8; len];
            input.read_exact(&mut bytes)?;
            Some(String::from_utf8(bytes)?)
        }
        other => return Err(WireError::BadPresenceFlag(other)),
    };

    if kind == CommandKind::Shutdown {
        let name = payload.unwrap_or_default();
        let mode = ShutdownMode::parse(&name).ok_or(WireError::BadShutdownMode(name))?;
        return Ok(Command::shutdown(mode));
    }
    Ok(Command::from_parts(kind, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip(cmd: &Command) -> Command {
        let bytes = encode_to_vec(cmd).expect("encode");
        decode(&mut Cursor::new(bytes)).expect("decode")
    }

    #[test]
    fn payload_free_kinds_roundtrip() {
        for cmd in [
            Command::noop(),
            Command::run_next_test(),
            Command::skip_remaining(),
            Command::ack_bye(),
        ] {
            assert_eq!(roundtrip(&cmd), cmd);
        }
    }

    #[test]
    fn shutdown_roundtrips_both_modes() {
        for mode in [ShutdownMode::Exit, ShutdownMode::Kill] {
            let cmd = Command::shutdown(mode);
            let back = roundtrip(&cmd);
            assert_eq!(back, cmd);
            assert_eq!(back.shutdown_mode(), Some(mode));
        }
    }

    #[test]
    fn shutdown_frame_layout_is_stable() {
        let bytes = encode_to_vec(&Command::shutdown(ShutdownMode::Exit)).expect("encode");
        assert_eq!(bytes[0], TAG_SHUTDOWN);
        assert_eq!(bytes[1], 1);
        assert_eq!(bytes[2..6], 4u32.to_le_bytes());
        assert_eq!(&bytes[6..], b"EXIT");
    }

    #[test]
    fn payload_free_frame_is_two_bytes() {
        let bytes = encode_to_vec(&Command::noop()).expect("encode");
        assert_eq!(bytes, vec![TAG_NOOP, 0]);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = decode(&mut Cursor::new(vec![0x7F, 0])).unwrap_err();
        assert!(matches!(err, WireError::UnknownTag(0x7F)));
    }

    #[test]
    fn bad_presence_flag_is_rejected() {
        let err = decode(&mut Cursor::new(vec![TAG_NOOP, 2])).unwrap_err();
        assert!(matches!(err, WireError::BadPresenceFlag(2)));
    }

    #[test]
    fn every_truncation_point_is_rejected() {
        let frame = encode_to_vec(&Command::shutdown(ShutdownMode::Kill)).expect("encode");
        for cut in 0..frame.len() {
            let err = decode(&mut Cursor::new(frame[..cut].to_vec())).unwrap_err();
            assert!(
                matches!(err, WireError::Truncated),
                "cut at {cut} gave {err:?}"
            );
        }
    }

    #[test]
    fn oversized_payload_length_is_rejected() {
        let mut frame = vec![TAG_SHUTDOWN, 1];
        frame.extend_from_slice(&(MAX_PAYLOAD_LEN as u32 + 1).to_le_bytes());
        let err = decode(&mut Cursor::new(frame)).unwrap_err();
        assert!(matches!(err, WireError::PayloadTooLarge { .. }));
    }

    #[test]
    fn invalid_utf8_payload_is_rejected() {
        let mut frame = vec![TAG_SHUTDOWN, 1];
        frame.extend_from_slice(&2u32.to_le_bytes());
        frame.extend_from_slice(&[0xFF, 0xFE]);
        let err = decode(&mut Cursor::new(frame)).unwrap_err();
        assert!(matches!(err, WireError::Utf8(_)));
    }

    #[test]
    fn unknown_shutdown_mode_is_rejected() {
        let mut frame = vec![TAG_SHUTDOWN, 1];
        frame.extend_from_slice(&4u32.to_le_bytes());
        frame.extend_from_slice(b"HALT");
        let err = decode(&mut Cursor::new(frame)).unwrap_err();
        assert!(matches!(err, WireError::BadShutdownMode(name) if name == "HALT"));
    }

    #[test]
    fn shutdown_without_payload_is_rejected() {
        let err = decode(&mut Cursor::new(vec![TAG_SHUTDOWN, 0])).unwrap_err();
        assert!(matches!(err, WireError::BadShutdownMode(_)));
    }

    #[test]
    fn frames_decode_back_to_back() {
        let mut bytes = Vec::new();
        encode(&Command::shutdown(ShutdownMode::Kill), &mut bytes).expect("encode");
        encode(&Command::noop(), &mut bytes).expect("encode");

        let mut cursor = Cursor::new(bytes);
        assert_eq!(
            decode(&mut cursor).expect("first frame"),
            Command::shutdown(ShutdownMode::Kill)
        );
        assert_eq!(decode(&mut cursor).expect("second frame"), Command::noop());
        assert!(matches!(
            decode(&mut cursor).unwrap_err(),
            WireError::Truncated
        ));
    }
}
