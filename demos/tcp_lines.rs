//! Single-connection TCP line reader example.
//!
//! Listens on 127.0.0.1:42069, accepts one connection and prints every line
//! until the peer closes. Try it with:
//!
//!     cargo run --example tcp_lines
//!     printf 'hello\r\nworld\n' | nc 127.0.0.1 42069

use std::env;

use linesrs::{DEFAULT_ADDR, Driver, Line, LineConfig, SocketSource, Source};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let addr = env::args().nth(1).unwrap_or_else(|| DEFAULT_ADDR.to_string());
    log::info!("waiting for one connection on {addr}");

    let mut driver = Driver::new(LineConfig::new(8)?);
    driver.open(|| SocketSource::accept(&addr).map(Source::from))?;

    let report = driver.run(&mut |line: Line| println!("read: {line}"))?;
    log::info!("peer closed after {} lines", report.lines);

    Ok(())
}
