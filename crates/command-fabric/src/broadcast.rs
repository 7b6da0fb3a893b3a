//! Append-only log of every broadcast command issued during a run.
//!
//! The log outlives per-channel consumption: entries are recorded even when
//! every live channel already has the kind latched. It seeds the latch set
//! of channels created after a broadcast, and feeds [`LogObserver`] cursors
//! that never reach a terminal end.

use std::sync::Arc;

use command_wire::Command;
use parking_lot::Mutex;

#[derive(Clone, Default)]
pub(crate) struct BroadcastLog {
    entries: Arc<Mutex<Vec<Command>>>,
}

impl BroadcastLog {
    pub(crate) fn append(&self, cmd: Command) {
        self.entries.lock().push(cmd);
    }

    /// Entries in append order, for replay into a newly created channel.
    pub(crate) fn snapshot(&self) -> Vec<Command> {
        self.entries.lock().clone()
    }

    fn get(&self, index: usize) -> Option<Command> {
        self.entries.lock().get(index).cloned()
    }

    pub(crate) fn observer(&self) -> LogObserver {
        LogObserver {
            log: self.clone(),
            cursor: 0,
        }
    }
}

/// Cursor over the broadcast log in append order.
///
/// The sequence never terminates: `try_next` returning `None` means no entry
/// has been appended past this cursor *yet*, and the same observer sees
/// entries appended later. Each observer advances independently.
pub struct LogObserver {
    log: BroadcastLog,
    cursor: usize,
}

impl LogObserver {
    /// Returns the next logged command, or `None` when the cursor is at the
    /// current tail.
    pub fn try_next(&mut self) -> Option<Command> {
        let cmd = self.log.get(self.cursor)?;
        self.cursor += 1;
        Some(cmd)
    }
}
