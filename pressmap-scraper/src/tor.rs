//! Control-channel signalling for the anonymizing proxy.

use crate::error::{Result, ScrapeError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

/// Asks the local anonymizing proxy for a new identity so further requests
/// leave through a fresh circuit. Fire-and-forget from the caller's point
/// of view; the reply is only checked for protocol-level rejection.
pub async fn renew_identity(addr: &str) -> Result<()> {
    let stream = TcpStream::connect(addr).await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    write_half.write_all(b"AUTHENTICATE \"\"\r\n").await?;
    reader.read_line(&mut line).await?;
    if !line.starts_with("250") {
        return Err(ScrapeError::ControlChannel(format!(
            "authentication rejected: {}",
            line.trim()
        )));
    }

    write_half.write_all(b"SIGNAL NEWNYM\r\n").await?;
    line.clear();
    reader.read_line(&mut line).await?;
    if !line.starts_with("250") {
        return Err(ScrapeError::ControlChannel(format!(
            "NEWNYM rejected: {}",
            line.trim()
        )));
    }

    // Best-effort goodbye; the signal already went through.
    let _ = write_half.write_all(b"QUIT\r\n").await;
    debug!("requested new identity from {addr}");
    Ok(())
}
