//! gor-frame
//!
//! Debugging companion for gor-middleware: `decode` turns wire lines into
//! JSON summaries, `encode` wraps a raw HTTP payload into a wire line.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};

use gor_middleware::frame::{decode, encode, Channel, Event};
use gor_middleware::http;

#[derive(Parser)]
#[command(name = "gor-frame")]
#[command(about = "Inspect and build middleware wire frames", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode wire lines from stdin into one JSON summary per line
    Decode,
    /// Wrap a raw HTTP payload from stdin into a wire line
    Encode {
        /// Channel of the event (request, response, replay)
        #[arg(short, long)]
        kind: Channel,

        /// Correlation id
        #[arg(short, long)]
        id: String,

        #[arg(long, default_value = "0")]
        timestamp: String,

        #[arg(long)]
        latency: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut stdout = tokio::io::stdout();

    match cli.command {
        Commands::Decode => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                if line.trim().is_empty() {
                    continue;
                }
                let summary = match decode(&line) {
                    Ok(event) => summarize(&event),
                    Err(e) => json!({ "error": e.to_string() }),
                };
                stdout.write_all(format!("{summary}\n").as_bytes()).await?;
            }
        }
        Commands::Encode {
            kind,
            id,
            timestamp,
            latency,
        } => {
            let kind = kind
                .kind()
                .ok_or("the message channel has no wire kind; use request, response or replay")?;

            let mut payload = Vec::new();
            tokio::io::stdin().read_to_end(&mut payload).await?;

            let mut tokens = vec![kind.to_string(), id.clone(), timestamp];
            tokens.extend(latency);
            let raw_meta = tokens.join(" ").into_bytes();

            let event = Event {
                id,
                kind: kind.to_string(),
                meta: raw_meta.split(|&b| b == b' ').map(<[u8]>::to_vec).collect(),
                raw_meta,
                payload,
            };
            stdout.write_all(encode(&event).as_bytes()).await?;
        }
    }

    stdout.flush().await?;
    Ok(())
}

fn summarize(event: &Event) -> Value {
    let text = |bytes: Option<&[u8]>| bytes.map(|b| String::from_utf8_lossy(b).into_owned());

    let mut summary = json!({
        "kind": event.kind,
        "channel": event.channel().map(|c| c.as_str()),
        "id": event.id,
        "timestamp": text(event.timestamp()),
        "latency": text(event.latency()),
        "payload_len": event.payload.len(),
    });

    match event.channel() {
        Some(Channel::Request) => {
            summary["method"] = json!(http::method(&event.payload).ok());
            summary["path"] = json!(http::path(&event.payload).ok());
        }
        Some(Channel::Response) | Some(Channel::Replay) => {
            summary["status"] = json!(http::status(&event.payload).ok());
        }
        _ => {}
    }
    summary
}
