//! End-to-end processing of wire lines through a configured middleware.

mod common;

use std::io::Cursor;

use common::{payload_of, run_lines, wire};
use gor_middleware::config::loader::parse_config;
use gor_middleware::frame::decode;
use gor_middleware::runtime::ProcessStats;
use gor_middleware::{Middleware, MiddlewareConfig, Shutdown};

const RULES: &str = r#"
    [[rules]]
    channel = "message"
    action = "set_header"
    name = "X-Replayed"
    value = "1"

    [[rules]]
    channel = "request"
    action = "set_path_param"
    name = "src"
    value = "gor"

    [[rules]]
    channel = "replay"
    action = "set_status"
    status = "200"
"#;

#[tokio::test]
async fn default_config_passes_frames_through() {
    let middleware = Middleware::new(MiddlewareConfig::default());
    let lines = vec![
        wire("1 5a1b 1700000000000000000\nGET /a HTTP/1.1\r\nHost: x\r\n\r\n"),
        wire("2 5a1b 1700000000000000000 1200\nHTTP/1.1 200 OK\r\n\r\n"),
    ];

    let (output, stats) = run_lines(&middleware, &lines).await;
    assert_eq!(output, lines);
    assert_eq!(stats.emitted, 2);
}

#[tokio::test]
async fn rules_rewrite_each_channel() {
    let middleware = Middleware::new(parse_config(RULES).unwrap());
    let lines = vec![
        wire("1 a1 100\nGET /a HTTP/1.1\r\nHost: x\r\n\r\n"),
        wire("2 a1 100 5\nHTTP/1.1 200 OK\r\n\r\n"),
        wire("3 a1 100 7\nHTTP/1.1 500 Internal Server Error\r\n\r\n"),
    ];

    let (output, _) = run_lines(&middleware, &lines).await;
    assert_eq!(output.len(), 3);
    assert_eq!(
        payload_of(&output[0]),
        "GET /a?src=gor HTTP/1.1\r\nX-Replayed: 1\r\nHost: x\r\n\r\n"
    );
    assert_eq!(payload_of(&output[1]), "HTTP/1.1 200 OK\r\nX-Replayed: 1\r\n\r\n");
    assert_eq!(
        payload_of(&output[2]),
        "HTTP/1.1 200 Internal Server Error\r\nX-Replayed: 1\r\n\r\n"
    );

    // Metadata survives the rewrite untouched.
    let replay = decode(&output[2]).unwrap();
    assert_eq!(replay.raw_meta, b"3 a1 100 7");
    assert_eq!(replay.latency(), Some(&b"7"[..]));
}

#[tokio::test]
async fn bad_lines_are_dropped_and_processing_continues() {
    let middleware = Middleware::new(MiddlewareConfig::default());
    let good = wire("1 ok 1\nGET / HTTP/1.1\r\n\r\n");
    let lines = vec![
        "not hex at all".to_string(),
        wire("no separator here"),
        String::new(),
        wire("9 x 1\nGET / HTTP/1.1\r\n\r\n"),
        good.clone(),
    ];

    let (output, stats) = run_lines(&middleware, &lines).await;
    assert_eq!(output, vec![good]);
    assert_eq!(
        stats,
        ProcessStats {
            emitted: 1,
            malformed: 2,
            unknown_kind: 1,
            blank: 1,
        }
    );
}

#[tokio::test]
async fn invalid_utf8_line_is_dropped_and_later_frames_survive() {
    let middleware = Middleware::new(MiddlewareConfig::default());
    let first = wire("1 u1 1\nGET /a HTTP/1.1\r\n\r\n");
    let second = wire("2 u1 1 2\nHTTP/1.1 200 OK\r\n\r\n");

    let mut input = b"\xff\xfe garbage\n".to_vec();
    input.extend_from_slice(format!("{first}\n{second}\n").as_bytes());

    let mut output = Vec::new();
    let stats = middleware
        .run(Cursor::new(input), &mut output, &Shutdown::new())
        .await
        .unwrap();

    assert_eq!(stats.emitted, 2);
    assert_eq!(stats.malformed, 1);
    assert_eq!(String::from_utf8(output).unwrap(), format!("{first}\n{second}\n"));
}

#[tokio::test]
async fn replay_check_counts_status_mismatches() {
    let mut config = MiddlewareConfig::default();
    config.replay_check.enabled = true;
    let middleware = Middleware::new(config);

    let lines = vec![
        wire("1 r1 1\nGET /same HTTP/1.1\r\n\r\n"),
        wire("1 r2 1\nPOST /differs HTTP/1.1\r\n\r\n"),
        wire("2 r1 1 3\nHTTP/1.1 200 OK\r\n\r\n"),
        wire("2 r2 1 3\nHTTP/1.1 201 Created\r\n\r\n"),
        wire("3 r1 1 4\nHTTP/1.1 200 OK\r\n\r\n"),
        wire("3 r2 1 4\nHTTP/1.1 409 Conflict\r\n\r\n"),
    ];

    let (output, _) = run_lines(&middleware, &lines).await;
    assert_eq!(output, lines);

    let stats = middleware.replay_stats().unwrap();
    assert_eq!(stats.matched(), 1);
    assert_eq!(stats.mismatched(), 1);
    assert_eq!(middleware.registry().stats().temporary, 0);
}
