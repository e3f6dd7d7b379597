//! Bounded FIFO of cues between producers and the player.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::sound::{Sound, SoundSet, SoundSlot};

/// Default capacity of the cue queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// A request to play the sound of one slot.
///
/// A cue without a sound is still queued; the player skips it.
#[derive(Debug, Clone)]
pub struct Cue {
    slot: SoundSlot,
    sound: Option<Arc<Sound>>,
}

impl Cue {
    /// Create a cue for `slot`, silent when `sound` is `None`.
    #[must_use]
    pub fn new(slot: SoundSlot, sound: Option<Arc<Sound>>) -> Self {
        Self { slot, sound }
    }

    /// The cue for a slot of the given soundset.
    #[must_use]
    pub fn from_set(sounds: &SoundSet, slot: SoundSlot) -> Self {
        Self::new(slot, sounds.get(slot).cloned())
    }

    /// Get the slot this cue announces.
    #[must_use]
    pub fn slot(&self) -> SoundSlot {
        self.slot
    }

    /// Get the sound to play, if any.
    #[must_use]
    pub fn sound(&self) -> Option<&Arc<Sound>> {
        self.sound.as_ref()
    }

    /// Whether there is nothing to play.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.sound.is_none()
    }
}

/// Error type for enqueue operations.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue was already closed.
    #[error("Cue queue is closed")]
    Closed,
    /// The player stopped receiving cues.
    #[error("Cue consumer has gone away")]
    ConsumerGone,
}

/// Producer side of the cue queue.
///
/// There is exactly one producer handle. Closing it ends the stream seen by
/// the receiver once the remaining cues are drained.
#[derive(Debug)]
pub struct CueQueue {
    tx: Option<mpsc::Sender<Cue>>,
    enqueued: usize,
}

/// Consumer side of the cue queue.
#[derive(Debug)]
pub struct CueReceiver {
    rx: mpsc::Receiver<Cue>,
}

/// Create a cue queue holding at most `capacity` pending cues.
///
/// # Panics
///
/// Panics if `capacity` is zero.
#[must_use]
pub fn cue_queue(capacity: usize) -> (CueQueue, CueReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        CueQueue {
            tx: Some(tx),
            enqueued: 0,
        },
        CueReceiver { rx },
    )
}

impl CueQueue {
    /// Append a cue, waiting while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Closed` after [`CueQueue::close`] and
    /// `QueueError::ConsumerGone` if the receiver was dropped.
    pub async fn enqueue(&mut self, cue: Cue) -> Result<(), QueueError> {
        let tx = self.tx.as_ref().ok_or(QueueError::Closed)?;
        tracing::trace!(slot = %cue.slot(), silent = cue.is_silent(), "Enqueue cue");
        tx.send(cue).await.map_err(|_| QueueError::ConsumerGone)?;
        self.enqueued += 1;
        Ok(())
    }

    /// Close the queue. Returns `true` if this call closed it.
    pub fn close(&mut self) -> bool {
        let closed = self.tx.take().is_some();
        if closed {
            tracing::debug!(enqueued = self.enqueued, "Cue queue closed");
        }
        closed
    }

    /// Whether [`CueQueue::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }

    /// Number of cues accepted so far.
    #[must_use]
    pub fn enqueued(&self) -> usize {
        self.enqueued
    }
}

impl CueReceiver {
    /// Next cue, or `None` once the queue is closed and drained.
    pub async fn next(&mut self) -> Option<Cue> {
        self.rx.recv().await
    }

    /// Blocking form of [`CueReceiver::next`] for the player thread.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_next(&mut self) -> Option<Cue> {
        self.rx.blocking_recv()
    }
}
