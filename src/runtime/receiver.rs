//! Input reader task.
//!
//! # Responsibilities
//! - Read newline-delimited frames from the input stream
//! - Hand each line to the processor over a bounded channel
//! - Stop on EOF, on a read error, or on shutdown
//!
//! # Design Decisions
//! - The bounded channel applies backpressure to the reader
//! - Lines are read as raw bytes; invalid UTF-8 is replaced, not fatal,
//!   so a garbled line fails decoding downstream and intake continues
//! - Dropping the sender is how the processor learns intake is over

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::lifecycle::ShutdownSignal;

/// Forward input lines until EOF or shutdown. Returns lines forwarded.
pub async fn run<R>(mut input: R, tx: mpsc::Sender<String>, mut shutdown: ShutdownSignal) -> u64
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut forwarded = 0u64;

    loop {
        buf.clear();
        tokio::select! {
            read = input.read_until(b'\n', &mut buf) => match read {
                Ok(0) => {
                    tracing::info!(lines = forwarded, "Input closed");
                    break;
                }
                Ok(_) => {
                    if tx.send(to_line(&buf)).await.is_err() {
                        tracing::debug!("Processor gone, stopping intake");
                        break;
                    }
                    forwarded += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read input, stopping intake");
                    break;
                }
            },
            _ = shutdown.recv() => {
                tracing::info!(lines = forwarded, "Receiver received shutdown signal, stopping intake");
                break;
            }
        }
    }

    forwarded
}

/// Strip the line terminator (`\n` or `\r\n`) and decode lossily.
fn to_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
