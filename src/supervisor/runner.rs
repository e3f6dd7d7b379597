//! Supervisor orchestrating the wrapped command, the line monitor and the
//! cue player.
//!
//! Ordering: the `start` cue is queued right after spawning and before the
//! first read; line cues follow in output order; the terminal cue is queued
//! only after end-of-stream and child exit, and the queue is closed right
//! after it.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::cue::{Cue, CueQueue, PlaybackSummary, PlayerHandle};
use crate::display;
use crate::monitor::{LineMonitor, MonitorReport, PatternMatcher};
use crate::sound::{SoundSet, SoundSlot};
use crate::supervisor::{ChildProcess, CommandLine, ExitOutcome, MonitoredStream, SpawnError};

/// Error type for supervisor startup.
#[derive(thiserror::Error, Debug)]
pub enum SupervisorError {
    /// The command could not be started.
    #[error("Failed to start command: {0}")]
    Spawn(#[from] SpawnError),
    /// The monitored stream of the command was not available.
    #[error("Monitored {0:?} pipe not available")]
    NoPipe(MonitoredStream),
}

/// Result of a supervised session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// How the command ended.
    pub outcome: ExitOutcome,
    /// The cue queued last.
    pub terminal: SoundSlot,
    /// What the line monitor saw.
    pub monitor: MonitorReport,
    /// What the player did, if it finished cleanly.
    pub playback: Option<PlaybackSummary>,
}

impl SessionReport {
    /// The program's own exit status.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

/// Supervisor for one wrapped command, or for standard input.
#[derive(Debug)]
pub struct Supervisor {
    settings: Settings,
    matcher: PatternMatcher,
    sounds: Arc<SoundSet>,
    queue: CueQueue,
    command: Option<CommandLine>,
}

impl Supervisor {
    /// Create a supervisor that produces into `queue`.
    #[must_use]
    pub fn new(
        settings: Settings,
        matcher: PatternMatcher,
        sounds: Arc<SoundSet>,
        queue: CueQueue,
    ) -> Self {
        Self {
            settings,
            matcher,
            sounds,
            queue,
            command: None,
        }
    }

    /// Wrap a command instead of monitoring standard input.
    #[must_use]
    pub fn with_command(mut self, command: Option<CommandLine>) -> Self {
        self.command = command;
        self
    }

    /// Get the resolved settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the wrapped command, if any.
    #[must_use]
    pub fn command(&self) -> Option<&CommandLine> {
        self.command.as_ref()
    }

    /// Run the session to completion.
    ///
    /// Without a command, standard input is monitored and copied to
    /// standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started. Nothing has been
    /// played at that point.
    pub async fn run(mut self, player: PlayerHandle) -> Result<SessionReport, SupervisorError> {
        match self.command.take() {
            Some(command) => self.run_command(&command, player).await,
            None => {
                Ok(self
                    .run_reader(tokio::io::stdin(), tokio::io::stdout(), player)
                    .await)
            }
        }
    }

    /// Monitor `input` without a child process, copying it to `output`.
    pub async fn run_reader<R, W>(
        mut self,
        input: R,
        output: W,
        player: PlayerHandle,
    ) -> SessionReport
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let monitor = LineMonitor::new(&self.matcher, &self.sounds)
            .run(input, output, &mut self.queue)
            .await;
        self.conclude(ExitOutcome::NoProcess, monitor, player).await
    }

    /// Spawn `command` and monitor its selected stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or its pipe is
    /// missing.
    pub async fn run_command(
        mut self,
        command: &CommandLine,
        player: PlayerHandle,
    ) -> Result<SessionReport, SupervisorError> {
        let stream = MonitoredStream::from_use_stdout(self.settings.use_stdout);
        let mut child = ChildProcess::spawn(command, stream)?;
        let Some(pipe) = child.take_monitored() else {
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "Failed to kill command");
            }
            return Err(SupervisorError::NoPipe(stream));
        };

        let interrupts = InterruptGuard::install();
        self.enqueue(SoundSlot::Start).await;

        let monitor = LineMonitor::new(&self.matcher, &self.sounds);
        let report = match stream {
            MonitoredStream::Stdout => {
                monitor
                    .run(pipe, tokio::io::stdout(), &mut self.queue)
                    .await
            }
            MonitoredStream::Stderr => {
                monitor
                    .run(pipe, tokio::io::stderr(), &mut self.queue)
                    .await
            }
        };

        let outcome = ExitOutcome::from_wait(child.wait().await);
        interrupts.arm(outcome.exit_code());
        tracing::info!(?outcome, "Command exited");

        Ok(self.conclude(outcome, report, player).await)
    }

    /// Queue the terminal cue, close the queue and wait for the player.
    async fn conclude(
        mut self,
        outcome: ExitOutcome,
        monitor: MonitorReport,
        player: PlayerHandle,
    ) -> SessionReport {
        let terminal = outcome.terminal_slot(monitor.any_cue_fired());
        self.enqueue(terminal).await;
        self.queue.close();

        let playback = match player.finished().await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!(error = %e, "Cue player failed");
                display::print_warning(&format!("audio feedback ended early: {e}"));
                None
            }
        };

        SessionReport {
            outcome,
            terminal,
            monitor,
            playback,
        }
    }

    async fn enqueue(&mut self, slot: SoundSlot) {
        let cue = Cue::from_set(&self.sounds, slot);
        if let Err(e) = self.queue.enqueue(cue).await {
            tracing::warn!(%slot, error = %e, "Failed to enqueue cue");
        }
    }
}

/// Ctrl-C handling while a command is supervised.
///
/// Until the command exits, interrupts are ignored: the command receives the
/// terminal's interrupt itself and errwarn stays around to play the terminal
/// cue. Once armed with the command's exit code, the next interrupt ends
/// errwarn with that code without waiting for the cue to finish. Tokio never
/// restores the default SIGINT disposition once a listener exists.
#[derive(Debug)]
struct InterruptGuard {
    exit_code: watch::Sender<Option<i32>>,
    task: JoinHandle<()>,
}

impl InterruptGuard {
    fn install() -> Self {
        let (exit_code, armed) = watch::channel(None);
        let task = tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                let code = *armed.borrow();
                match code {
                    Some(code) => {
                        tracing::info!(code, "Interrupted after command exit");
                        std::process::exit(code);
                    }
                    None => tracing::debug!("Interrupt received, waiting for command to exit"),
                }
            }
        });
        Self { exit_code, task }
    }

    /// Let the next interrupt exit with `code`.
    fn arm(&self, code: i32) {
        self.exit_code.send_replace(Some(code));
    }

    #[cfg(test)]
    fn armed_exit_code(&self) -> Option<i32> {
        *self.exit_code.borrow()
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}
