//! Child process spawning.
//!
//! The child inherits standard input and the stream that is not monitored.
//! The monitored stream is piped back to the supervisor.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

/// Error type for process spawning operations.
#[derive(thiserror::Error, Debug)]
pub enum SpawnError {
    /// The program was not found.
    #[error("{0}: command not found")]
    NotFound(String),
    /// Permission denied when spawning.
    #[error("{0}: permission denied")]
    PermissionDenied(String),
    /// Other I/O error.
    #[error("{program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

impl SpawnError {
    /// Create a `SpawnError` from an I/O error, classifying common cases.
    fn from_io(program: &OsStr, err: std::io::Error) -> Self {
        let program = program.to_string_lossy().into_owned();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(program),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(program),
            _ => Self::Io {
                program,
                source: err,
            },
        }
    }
}

/// Which of the child's output streams is monitored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonitoredStream {
    Stdout,
    #[default]
    Stderr,
}

impl MonitoredStream {
    /// Select stdout when `use_stdout` is set, stderr otherwise.
    #[must_use]
    pub fn from_use_stdout(use_stdout: bool) -> Self {
        if use_stdout {
            Self::Stdout
        } else {
            Self::Stderr
        }
    }
}

/// The command to wrap: a program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    /// Create a command line without arguments.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Split positional arguments into program and arguments. Returns
    /// `None` when there are none.
    #[must_use]
    pub fn from_args(args: Vec<OsString>) -> Option<Self> {
        let mut args = args.into_iter();
        let program = args.next()?;
        Some(Self {
            program,
            args: args.collect(),
        })
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Get the program.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Get the arguments.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Preset name implied by the program: its file name without
    /// extension.
    #[must_use]
    pub fn preset_name(&self) -> Option<String> {
        Path::new(&self.program)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
    }
}

/// A running child process.
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    monitored: MonitoredStream,
}

impl ChildProcess {
    /// Spawn the command with the monitored stream piped.
    ///
    /// # Errors
    ///
    /// Returns `SpawnError` if the process fails to spawn.
    pub fn spawn(command: &CommandLine, monitored: MonitoredStream) -> Result<Self, SpawnError> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args()).stdin(Stdio::inherit());

        match monitored {
            MonitoredStream::Stdout => cmd.stdout(Stdio::piped()).stderr(Stdio::inherit()),
            MonitoredStream::Stderr => cmd.stdout(Stdio::inherit()).stderr(Stdio::piped()),
        };

        let child = cmd
            .spawn()
            .map_err(|e| SpawnError::from_io(command.program(), e))?;
        tracing::info!(
            program = %command.program().to_string_lossy(),
            pid = ?child.id(),
            monitored = ?monitored,
            "Spawned command"
        );

        Ok(Self { child, monitored })
    }

    /// Take ownership of the monitored stream.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_monitored(&mut self) -> Option<Box<dyn AsyncRead + Send + Unpin>> {
        match self.monitored {
            MonitoredStream::Stdout => self
                .child
                .stdout
                .take()
                .map(|s| Box::new(s) as Box<dyn AsyncRead + Send + Unpin>),
            MonitoredStream::Stderr => self
                .child
                .stderr
                .take()
                .map(|s| Box::new(s) as Box<dyn AsyncRead + Send + Unpin>),
        }
    }

    /// Get the monitored stream.
    #[must_use]
    pub fn monitored(&self) -> MonitoredStream {
        self.monitored
    }

    /// Get the process ID, if still running.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the process to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting fails.
    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Forcefully kill the process and reap it.
    ///
    /// # Errors
    ///
    /// Returns an error if the kill signal cannot be sent.
    pub async fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill().await
    }
}
