//! Sequential frame processing.
//!
//! # Responsibilities
//! - Decode, dispatch and emit one line at a time
//! - Report malformed frames and unknown kinds, then move on
//!
//! # Design Decisions
//! - Strictly sequential: line N is fully emitted before line N+1 is decoded
//! - Output is flushed after every frame so the capture tool never waits
//! - Only output I/O errors end the loop

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::dispatch::{DispatchError, Dispatcher};
use crate::frame::{decode, FrameError};
use crate::observability::metrics;

/// Why a line produced no output.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ProcessError {
    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            ProcessError::Frame(_) => "malformed",
            ProcessError::Dispatch(DispatchError::UnknownEventKind(_)) => "unknown_kind",
        }
    }
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub emitted: u64,
    pub malformed: u64,
    pub unknown_kind: u64,
    pub blank: u64,
}

pub struct Processor {
    dispatcher: Dispatcher,
    stats: ProcessStats,
}

impl Processor {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            stats: ProcessStats::default(),
        }
    }

    /// Decode and dispatch one line, returning the wire line to emit.
    pub fn process_line(&self, line: &str) -> Result<String, ProcessError> {
        let event = decode(line)?;
        Ok(self.dispatcher.dispatch(event)?)
    }

    /// Process lines until the sender side closes.
    pub async fn run<W>(mut self, mut lines: mpsc::Receiver<String>, output: &mut W) -> std::io::Result<ProcessStats>
    where
        W: AsyncWrite + Unpin,
    {
        while let Some(line) = lines.recv().await {
            if line.trim().is_empty() {
                self.stats.blank += 1;
                continue;
            }

            match self.process_line(&line) {
                Ok(frame) => {
                    output.write_all(frame.as_bytes()).await?;
                    output.flush().await?;
                    self.stats.emitted += 1;
                    metrics::record_frame("dispatched");
                }
                Err(e) => {
                    match &e {
                        ProcessError::Frame(_) => self.stats.malformed += 1,
                        ProcessError::Dispatch(_) => self.stats.unknown_kind += 1,
                    }
                    metrics::record_frame(e.outcome());
                    tracing::warn!(error = %e, line_len = line.len(), "Dropping frame");
                }
            }
        }

        tracing::info!(
            emitted = self.stats.emitted,
            malformed = self.stats.malformed,
            unknown_kind = self.stats.unknown_kind,
            "Processor finished"
        );
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Registry;
    use std::sync::Arc;

    fn processor() -> Processor {
        Processor::new(Dispatcher::new(Arc::new(Registry::new())))
    }

    #[test]
    fn outcomes() {
        let processor = processor();
        let good = hex::encode("1 2 3\nGET / HTTP/1.1\r\n\r\n");
        assert_eq!(processor.process_line(&good).unwrap(), format!("{good}\n"));

        let err = processor.process_line("not hex").unwrap_err();
        assert_eq!(err.outcome(), "malformed");

        let err = processor
            .process_line(&hex::encode("9 2 3\nGET / HTTP/1.1\r\n\r\n"))
            .unwrap_err();
        assert_eq!(err.outcome(), "unknown_kind");
    }

    #[tokio::test]
    async fn bad_lines_are_skipped() {
        let (tx, rx) = mpsc::channel(8);
        let good = hex::encode("2 2 3\nHTTP/1.1 200 OK\r\n\r\n");
        for line in ["zz".to_string(), String::new(), good.clone(), hex::encode("7 1 1\nx y z")] {
            tx.send(line).await.unwrap();
        }
        drop(tx);

        let mut output = Vec::new();
        let stats = processor().run(rx, &mut output).await.unwrap();
        assert_eq!(
            stats,
            ProcessStats {
                emitted: 1,
                malformed: 1,
                unknown_kind: 1,
                blank: 1,
            }
        );
        assert_eq!(String::from_utf8(output).unwrap(), format!("{good}\n"));
    }
}
