//! Async line reading example.
//!
//! Accepts one TCP connection with tokio and streams its lines through the
//! runtime-agnostic `lines_async` adapter.
//!
//! Run with:
//!     cargo run --example async_lines --features async-io

use futures_util::StreamExt;
use linesrs::{DEFAULT_ADDR, LineConfig, lines_async};
use tokio::net::TcpListener;
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let listener = TcpListener::bind(DEFAULT_ADDR).await?;
    log::info!("waiting for one connection on {DEFAULT_ADDR}");

    let (socket, peer) = listener.accept().await?;
    log::info!("connected by {peer}");

    let mut lines = lines_async(socket.compat(), LineConfig::default());
    while let Some(line) = lines.next().await {
        println!("read: {}", line?);
    }

    Ok(())
}
