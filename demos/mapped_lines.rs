//! Memory-mapped line reading example.
//!
//! Run with:
//!     cargo run --example mapped_lines -- /path/to/messages.txt

use std::env;

use linesrs::{DecodeErrorAction, Line, LineConfig, StreamStatus, drive_mapped};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "messages.txt".to_string());

    let config = LineConfig::default().with_decode_error_action(DecodeErrorAction::Skip);
    let report = drive_mapped(&path, config, &mut |line: Line| {
        println!("read: {line}")
    })?;

    match report.status {
        StreamStatus::Empty => log::info!("{path} is empty"),
        StreamStatus::Completed => log::info!(
            "{} lines ({} skipped) from {} mapped bytes",
            report.lines,
            report.skipped,
            report.bytes
        ),
    }

    Ok(())
}
