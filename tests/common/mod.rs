//! Shared utilities for integration testing.

use std::io::Cursor;

use gor_middleware::frame::decode;
use gor_middleware::runtime::ProcessStats;
use gor_middleware::{Middleware, Shutdown};

/// Hex-encode a raw `<meta>\n<http>` frame into a wire line (no newline).
pub fn wire(raw: &str) -> String {
    hex::encode(raw.as_bytes())
}

/// Feed `lines` through `middleware` and collect the emitted wire lines.
pub async fn run_lines(middleware: &Middleware, lines: &[String]) -> (Vec<String>, ProcessStats) {
    let input = Cursor::new(lines.join("\n").into_bytes());
    let mut output = Vec::new();
    let stats = middleware
        .run(input, &mut output, &Shutdown::new())
        .await
        .unwrap();

    let output = String::from_utf8(output).unwrap();
    (output.lines().map(str::to_string).collect(), stats)
}

/// Decode a wire line and return its payload as text.
#[allow(dead_code)]
pub fn payload_of(line: &str) -> String {
    String::from_utf8(decode(line).unwrap().payload).unwrap()
}
