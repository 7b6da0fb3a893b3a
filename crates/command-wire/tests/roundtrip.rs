//! Property checks for the command frame codec.

use std::io::Cursor;

use command_wire::{decode, encode, encode_to_vec, Command, ShutdownMode};
use proptest::prelude::*;

fn any_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::noop()),
        Just(Command::run_next_test()),
        Just(Command::skip_remaining()),
        Just(Command::ack_bye()),
        Just(Command::shutdown(ShutdownMode::Exit)),
        Just(Command::shutdown(ShutdownMode::Kill)),
    ]
}

proptest! {
    /// Every representable command survives encode-then-decode unchanged.
    #[test]
    fn roundtrip_law(cmd in any_command()) {
        let bytes = encode_to_vec(&cmd).expect("encode");
        let back = decode(&mut Cursor::new(bytes)).expect("decode");
        prop_assert_eq!(back, cmd);
    }

    /// Concatenated frames decode back in order, so a stream of frames is
    /// self-delimiting without any out-of-band framing.
    #[test]
    fn frame_sequences_are_self_delimiting(cmds in proptest::collection::vec(any_command(), 1..16)) {
        let mut bytes = Vec::new();
        for cmd in &cmds {
            encode(cmd, &mut bytes).expect("encode");
        }
        let mut cursor = Cursor::new(bytes);
        for cmd in &cmds {
            prop_assert_eq!(&decode(&mut cursor).expect("decode"), cmd);
        }
    }

    /// Arbitrary garbage never panics the decoder; it either parses as a
    /// frame or reports a malformed-frame error.
    #[test]
    fn decode_is_total_over_garbage(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = decode(&mut Cursor::new(bytes));
    }
}
