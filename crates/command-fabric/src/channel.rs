//! Blocking per-worker command channel.
//!
//! A channel merges two command sources for one worker: a FIFO of targeted
//! one-shot commands and a latch set of standing broadcast commands (at most
//! one pending entry per kind, in commit order). A ready count tracks how
//! many takes are currently legal; [`CommandChannel::wait_for_next`] is the
//! only suspending operation and decrements it, while
//! [`CommandChannel::take_next`] dequeues without blocking and never holds
//! the state lock across a park.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::Arc;

use command_wire::{encode_to_vec, Command};
use log::trace;
use parking_lot::{Condvar, Mutex};
use smallvec::SmallVec;

use crate::error::{FabricError, FabricResult};

#[derive(Default)]
struct ChannelState {
    fifo: VecDeque<Command>,
    // Pending broadcast commands in commit order, at most one per kind.
    latched: SmallVec<[Command; 2]>,
    ready: usize,
    closed: bool,
}

struct ChannelShared {
    state: Mutex<ChannelState>,
    readable: Condvar,
}

/// Handle to one worker's command channel. Clones share the same state;
/// producers signal through crate-internal methods while the worker-facing
/// side blocks on [`wait_for_next`](Self::wait_for_next) and dequeues with
/// [`take_next`](Self::take_next).
#[derive(Clone)]
pub struct CommandChannel {
    shared: Arc<ChannelShared>,
}

impl CommandChannel {
    pub(crate) fn new() -> Self {
        Self {
            shared: Arc::new(ChannelShared {
                state: Mutex::new(ChannelState::default()),
                readable: Condvar::new(),
            }),
        }
    }

    pub(crate) fn same_channel(&self, other: &CommandChannel) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Appends a targeted command to the FIFO and wakes one waiter.
    /// Sends to a closed channel are dropped.
    pub(crate) fn signal_targeted(&self, cmd: Command) {
        let mut state = self.shared.state.lock();
        if state.closed {
            return;
        }
        trace!("targeted {:?} enqueued", cmd.kind());
        state.fifo.push_back(cmd);
        state.ready += 1;
        self.shared.readable.notify_one();
    }

    /// Latches a broadcast command unless its kind is already pending.
    /// Re-latching a pending kind leaves the ready count untouched.
    pub(crate) fn signal_broadcast(&self, cmd: Command) {
        let mut state = self.shared.state.lock();
        if state.closed {
            return;
        }
        if state.latched.iter().any(|c| c.kind() == cmd.kind()) {
            trace!("broadcast {:?} already latched, dropped", cmd.kind());
            return;
        }
        trace!("broadcast {:?} latched", cmd.kind());
        state.latched.push(cmd);
        state.ready += 1;
        self.shared.readable.notify_one();
    }

    /// Blocks until a take is legal, then consumes one unit of readiness.
    ///
    /// Returns [`FabricError::Closed`] instead of blocking forever once the
    /// channel has been removed. When the ready count is already positive
    /// this returns immediately without suspending.
    pub fn wait_for_next(&self) -> FabricResult<()> {
        let mut state = self.shared.state.lock();
        loop {
            if state.ready > 0 {
                state.ready -= 1;
                return Ok(());
            }
            if state.closed {
                return Err(FabricError::Closed);
            }
            self.shared.readable.wait(&mut state);
        }
    }

    /// Dequeues without blocking: the targeted FIFO head first, otherwise the
    /// earliest-latched pending broadcast kind (which is cleared).
    ///
    /// Fails with [`FabricError::Exhausted`] when neither source has an item;
    /// probing for that is a legal caller pattern. Never fails after a
    /// successful [`wait_for_next`](Self::wait_for_next) under single-consumer
    /// use.
    pub fn take_next(&self) -> FabricResult<Command> {
        let mut state = self.shared.state.lock();
        if let Some(cmd) = state.fifo.pop_front() {
            return Ok(cmd);
        }
        if !state.latched.is_empty() {
            return Ok(state.latched.remove(0));
        }
        if state.closed {
            Err(FabricError::Closed)
        } else {
            Err(FabricError::Exhausted)
        }
    }

    /// Current ready count: targeted items plus distinct pending latched
    /// kinds, minus waits already granted.
    pub fn available(&self) -> usize {
        self.shared.state.lock().ready
    }

    /// Targeted self-signal: queue a keep-alive for this worker.
    pub fn noop(&self) {
        self.signal_targeted(Command::noop());
    }

    /// Targeted self-signal acknowledging the worker's bye event.
    pub fn acknowledge_bye(&self) {
        self.signal_targeted(Command::ack_bye());
    }

    /// Closes the channel: pending items are discarded and every blocked
    /// waiter is released with [`FabricError::Closed`]. Idempotent.
    pub(crate) fn close(&self) {
        let mut state = self.shared.state.lock();
        state.closed = true;
        state.fifo.clear();
        state.latched.clear();
        state.ready = 0;
        self.shared.readable.notify_all();
    }

    /// A sequential byte view over this channel: each frame is produced by
    /// one wait/take/encode cycle, lazily, as the reader is drained.
    pub fn reader(&self) -> ChannelReader {
        ChannelReader {
            channel: self.clone(),
            frame: Vec::new(),
            pos: 0,
        }
    }
}

/// Blocking `io::Read` adapter over a [`CommandChannel`].
///
/// Reads that arrive mid-frame return the buffered remainder; once a frame
/// is exhausted the next read blocks on the channel again. A closed channel
/// reads as end-of-stream.
pub struct ChannelReader {
    channel: CommandChannel,
    frame: Vec<u8>,
    pos: usize,
}

impl Read for ChannelReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        if self.pos == self.frame.len() {
            match self.channel.wait_for_next() {
                Ok(()) => {}
                Err(FabricError::Closed) => return Ok(0),
                Err(err) => return Err(io::Error::new(io::ErrorKind::Other, err)),
            }
            let cmd = match self.channel.take_next() {
                Ok(cmd) => cmd,
                Err(FabricError::Closed) => return Ok(0),
                Err(err) => return Err(io::Error::new(io::ErrorKind::Other, err)),
            };
            self.frame = encode_to_vec(&cmd)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            self.pos = 0;
        }
        let n = out.len().min(self.frame.len() - self.pos);
        out[..n].copy_from_slice(&self.frame[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
