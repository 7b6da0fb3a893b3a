//! Command values exchanged between the orchestrator and its workers.

/// Kind discriminant of a [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Keep-alive; the worker reads it and does nothing.
    Noop,
    /// Tells the worker to pick up the next test.
    RunNextTest,
    /// Standing instruction to skip every test not yet started.
    SkipRemaining,
    /// Terminates the worker; the payload names the [`ShutdownMode`].
    Shutdown,
    /// Acknowledges the worker's bye event so it may exit its read loop.
    AckBye,
}

/// How a worker terminates on [`CommandKind::Shutdown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Finish the test in flight, then exit normally.
    Exit,
    /// Stop immediately, skipping cleanup.
    Kill,
}

impl ShutdownMode {
    /// Canonical name carried as the shutdown frame payload.
    pub fn as_str(self) -> &'static str {
        match self {
            ShutdownMode::Exit => "EXIT",
            ShutdownMode::Kill => "KILL",
        }
    }

    /// Parses a canonical name back into a mode.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "EXIT" => Some(ShutdownMode::Exit),
            "KILL" => Some(ShutdownMode::Kill),
            _ => None,
        }
    }
}

/// One orchestrator→worker command: a kind plus an optional UTF-8 payload.
///
/// Commands compare structurally and are immutable once constructed. Only
/// shutdown commands carry a payload; the per-kind constructors are the only
/// public way to build one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    kind: CommandKind,
    payload: Option<String>,
}

impl Command {
    pub fn noop() -> Self {
        Self::from_parts(CommandKind::Noop, None)
    }

    pub fn run_next_test() -> Self {
        Self::from_parts(CommandKind::RunNextTest, None)
    }

    pub fn skip_remaining() -> Self {
        Self::from_parts(CommandKind::SkipRemaining, None)
    }

    pub fn ack_bye() -> Self {
        Self::from_parts(CommandKind::AckBye, None)
    }

    /// Builds a shutdown command whose payload is the mode's canonical name.
    pub fn shutdown(mode: ShutdownMode) -> Self {
        Self::from_parts(CommandKind::Shutdown, Some(mode.as_str().to_owned()))
    }

    pub(crate) fn from_parts(kind: CommandKind, payload: Option<String>) -> Self {
        Self { kind, payload }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// The shutdown mode, when this is a shutdown command.
    pub fn shutdown_mode(&self) -> Option<ShutdownMode> {
        match self.kind {
            CommandKind::Shutdown => self.payload.as_deref().and_then(ShutdownMode::parse),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_payload_is_canonical_mode_name() {
        assert_eq!(Command::shutdown(ShutdownMode::Exit).payload(), Some("EXIT"));
        assert_eq!(Command::shutdown(ShutdownMode::Kill).payload(), Some("KILL"));
        assert_eq!(
            Command::shutdown(ShutdownMode::Kill).shutdown_mode(),
            Some(ShutdownMode::Kill)
        );
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(Command::noop(), Command::noop());
        assert_eq!(
            Command::shutdown(ShutdownMode::Exit),
            Command::shutdown(ShutdownMode::Exit)
        );
        assert_ne!(
            Command::shutdown(ShutdownMode::Exit),
            Command::shutdown(ShutdownMode::Kill)
        );
        assert_ne!(Command::noop(), Command::ack_bye());
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in [ShutdownMode::Exit, ShutdownMode::Kill] {
            assert_eq!(ShutdownMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(ShutdownMode::parse("HALT"), None);
    }
}
