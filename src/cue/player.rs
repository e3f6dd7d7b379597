//! Sequenced cue playback.
//!
//! The player is the only consumer of the cue queue and the only user of
//! the audio device. It plays at most one cue at a time: a new cue stops
//! whatever is still playing, and after starting a cue it waits a short
//! spacing before taking the next one.

use std::thread;
use std::time::Duration;

use tokio::sync::oneshot;

use super::{Cue, CueOutput, CueReceiver};
use crate::sound::SoundSlot;

/// Minimum time between starting one cue and taking the next.
pub const CUE_SPACING: Duration = Duration::from_millis(50);

/// Error type for player operations.
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    /// The audio device could not be opened.
    #[error("Failed to open audio output: {0}")]
    Device(String),
    /// The device refused to play a sound.
    #[error("Failed to play {slot} sound: {reason}")]
    Playback { slot: SoundSlot, reason: String },
    /// The player thread could not be started.
    #[error("Failed to start player thread: {0}")]
    Thread(#[from] std::io::Error),
    /// The player thread ended without reporting.
    #[error("Player thread exited unexpectedly")]
    Crashed,
}

/// Whether a sound is currently playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerState {
    #[default]
    Idle,
    Playing,
}

/// Player tuning.
#[derive(Debug, Clone, Copy)]
pub struct PlayerOptions {
    /// Minimum time between starting one cue and taking the next.
    pub spacing: Duration,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            spacing: CUE_SPACING,
        }
    }
}

/// What the player did over its lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Slots whose sounds were started, in order.
    pub played: Vec<SoundSlot>,
    /// Cues without a sound.
    pub skipped: usize,
    /// Sounds cut short by a newer cue.
    pub preempted: usize,
    /// Sounds the device refused to play.
    pub failed: usize,
}

/// Single-consumer player driving a [`CueOutput`].
pub struct SequencedPlayer<O> {
    output: O,
    state: PlayerState,
    options: PlayerOptions,
    summary: PlaybackSummary,
}

impl<O: CueOutput> SequencedPlayer<O> {
    /// Create an idle player driving `output`.
    #[must_use]
    pub fn new(output: O, options: PlayerOptions) -> Self {
        Self {
            output,
            state: PlayerState::Idle,
            options,
            summary: PlaybackSummary::default(),
        }
    }

    /// Get the current state.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Play cues until the queue is closed and drained, then wait for the
    /// last sound to finish.
    pub fn run(mut self, mut cues: CueReceiver) -> PlaybackSummary {
        while let Some(cue) = cues.blocking_next() {
            self.handle(&cue);
        }
        self.finish();
        self.summary
    }

    /// Handle one dequeued cue.
    pub fn handle(&mut self, cue: &Cue) {
        let Some(sound) = cue.sound() else {
            tracing::debug!(slot = %cue.slot(), "No sound for cue, skipping");
            self.summary.skipped += 1;
            return;
        };

        self.poll();
        if self.state == PlayerState::Playing {
            tracing::debug!(slot = %cue.slot(), "Preempting current sound");
            self.summary.preempted += 1;
        }
        // Also clears any residue when the player believes it is idle.
        self.output.stop();

        match self.output.play(cue.slot(), sound) {
            Ok(()) => {
                tracing::debug!(slot = %cue.slot(), duration = ?sound.duration(), "Playing cue");
                self.summary.played.push(cue.slot());
                self.transition(PlayerState::Playing);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to play cue");
                self.summary.failed += 1;
                self.transition(PlayerState::Idle);
            }
        }

        if !self.options.spacing.is_zero() {
            thread::sleep(self.options.spacing);
        }
    }

    /// Wait for the current sound, if any, to finish.
    pub fn finish(&mut self) {
        self.poll();
        if self.state == PlayerState::Playing {
            self.output.wait_until_idle();
            self.transition(PlayerState::Idle);
        }
    }

    /// Notice a sound that finished on its own.
    fn poll(&mut self) {
        if self.state == PlayerState::Playing && self.output.is_idle() {
            self.transition(PlayerState::Idle);
        }
    }

    fn transition(&mut self, new_state: PlayerState) {
        if self.state != new_state {
            tracing::trace!(from = ?self.state, to = ?new_state, "Player state transition");
            self.state = new_state;
        }
    }
}

/// A player running on its own thread.
#[derive(Debug)]
pub struct PlayerHandle {
    done: oneshot::Receiver<PlaybackSummary>,
}

impl PlayerHandle {
    /// Start the player thread.
    ///
    /// `open` runs on the player thread, which owns the device for its whole
    /// life. This resolves once the device is open.
    ///
    /// # Errors
    ///
    /// Returns the error from `open`, or `PlayerError::Thread` if the thread
    /// cannot be started.
    pub async fn spawn<O, F>(
        open: F,
        cues: CueReceiver,
        options: PlayerOptions,
    ) -> Result<Self, PlayerError>
    where
        O: CueOutput + 'static,
        F: FnOnce() -> Result<O, PlayerError> + Send + 'static,
    {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();

        thread::Builder::new()
            .name("errwarn-player".to_string())
            .spawn(move || {
                let output = match open() {
                    Ok(output) => output,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                let summary = SequencedPlayer::new(output, options).run(cues);
                tracing::debug!(
                    played = summary.played.len(),
                    skipped = summary.skipped,
                    preempted = summary.preempted,
                    "Player finished"
                );
                let _ = done_tx.send(summary);
            })?;

        ready_rx.await.map_err(|_| PlayerError::Crashed)??;
        Ok(Self { done: done_rx })
    }

    /// Wait until every queued cue has been handled and the last sound has
    /// finished playing.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Crashed` if the player thread died.
    pub async fn finished(self) -> Result<PlaybackSummary, PlayerError> {
        self.done.await.map_err(|_| PlayerError::Crashed)
    }
}
