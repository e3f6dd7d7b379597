//! Tee a stream to the terminal while classifying its lines.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{LineClass, PatternMatcher};
use crate::cue::{Cue, CueQueue};
use crate::sound::SoundSet;

/// Size of each read from the monitored stream.
pub const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Longest line prefix that is classified. The rest of a longer line is
/// passed through but not scanned.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Splits a byte stream into newline-terminated lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    truncated: bool,
}

impl LineBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect the lines it completes.
    ///
    /// Trailing `\r` is stripped and invalid UTF-8 replaced. A line longer
    /// than [`MAX_LINE_BYTES`] yields only its first `MAX_LINE_BYTES` bytes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.append(&rest[..pos]);
            lines.push(self.take_line());
            rest = &rest[pos + 1..];
        }
        self.append(rest);

        lines
    }

    /// The unterminated last line, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() && !self.truncated {
            None
        } else {
            Some(self.take_line())
        }
    }

    fn append(&mut self, bytes: &[u8]) {
        if self.truncated {
            return;
        }
        let room = MAX_LINE_BYTES - self.pending.len();
        if bytes.len() > room {
            self.pending.extend_from_slice(&bytes[..room]);
            self.truncated = true;
            tracing::trace!(max = MAX_LINE_BYTES, "Line too long, scanning its prefix only");
        } else {
            self.pending.extend_from_slice(bytes);
        }
    }

    fn take_line(&mut self) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        if !std::mem::take(&mut self.truncated) && bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Counts of what the monitor saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorReport {
    /// Lines scanned.
    pub lines: usize,
    /// Lines classified as errors.
    pub errors: usize,
    /// Lines classified as warnings.
    pub warnings: usize,
}

impl MonitorReport {
    /// Whether any line triggered an error or warning cue.
    #[must_use]
    pub fn any_cue_fired(&self) -> bool {
        self.errors > 0 || self.warnings > 0
    }
}

/// Copies a stream to its passthrough verbatim and enqueues a cue for every
/// error or warning line.
#[derive(Debug)]
pub struct LineMonitor<'a> {
    matcher: &'a PatternMatcher,
    sounds: &'a SoundSet,
}

impl<'a> LineMonitor<'a> {
    /// Create a monitor classifying with `matcher` and cueing from `sounds`.
    #[must_use]
    pub fn new(matcher: &'a PatternMatcher, sounds: &'a SoundSet) -> Self {
        Self { matcher, sounds }
    }

    /// Run until the input reaches end-of-stream.
    ///
    /// Every chunk is written to `passthrough` before its lines are scanned.
    /// A read error ends the stream. A write error stops passthrough but the
    /// input keeps being drained so the writer on the other end never
    /// blocks.
    pub async fn run<R, W>(
        &self,
        mut input: R,
        mut passthrough: W,
        queue: &mut CueQueue,
    ) -> MonitorReport
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut report = MonitorReport::default();
        let mut lines = LineBuffer::new();
        let mut buf = vec![0u8; READ_CHUNK_SIZE];
        let mut passthrough_ok = true;
        let mut queue_ok = true;

        loop {
            let n = match input.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read monitored stream, treating as end of stream");
                    break;
                }
            };
            let chunk = &buf[..n];

            if passthrough_ok {
                if let Err(e) = write_through(&mut passthrough, chunk).await {
                    tracing::warn!(error = %e, "Failed to write passthrough output");
                    passthrough_ok = false;
                }
            }

            for line in lines.push(chunk) {
                self.scan(&line, &mut report, queue, &mut queue_ok).await;
            }
        }

        if let Some(line) = lines.finish() {
            self.scan(&line, &mut report, queue, &mut queue_ok).await;
        }

        tracing::debug!(
            lines = report.lines,
            errors = report.errors,
            warnings = report.warnings,
            "Monitored stream ended"
        );
        report
    }

    async fn scan(
        &self,
        line: &str,
        report: &mut MonitorReport,
        queue: &mut CueQueue,
        queue_ok: &mut bool,
    ) {
        report.lines += 1;

        let class = self.matcher.classify(line);
        match class {
            LineClass::None => return,
            LineClass::Error => report.errors += 1,
            LineClass::Warning => report.warnings += 1,
        }
        let Some(slot) = class.cue_slot() else {
            return;
        };
        tracing::debug!(%slot, line, "Matched line");

        if !*queue_ok {
            return;
        }
        if let Err(e) = queue.enqueue(Cue::from_set(self.sounds, slot)).await {
            tracing::warn!(error = %e, "Cannot enqueue cue, further cues are dropped");
            *queue_ok = false;
        }
    }
}

async fn write_through<W>(out: &mut W, chunk: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(chunk).await?;
    out.flush().await
}
