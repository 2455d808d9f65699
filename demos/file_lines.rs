//! Line-by-line file reading example.
//!
//! Run with:
//!     cargo run --example file_lines -- /path/to/messages.txt

use std::env;
use std::process::ExitCode;

use linesrs::{Driver, FileSource, Line, LineConfig, LineError};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "messages.txt".to_string());

    // Tiny reads make lines straddle chunk boundaries
    let config = LineConfig::new(8).expect("invalid config");

    let mut driver = Driver::new(config);
    if let Err(e) = driver.open(|| FileSource::open(&path)) {
        return match e {
            LineError::NotFound { .. } => {
                log::error!("File Not Found at path: {path}");
                ExitCode::SUCCESS
            }
            _ => ExitCode::FAILURE,
        };
    }

    match driver.run(&mut |line: Line| println!("read: {line}")) {
        Ok(report) => {
            log::info!("{} lines, {} bytes", report.lines, report.bytes);
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}
