//! The fixed acknowledgement response.
//!
//! This server produces exactly one response, ever: a success status
//! line, a header instructing the peer to close, and a short fixed body.
//! Errors close the connection without a response.

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// The only bytes this server writes to a client.
pub const ACK_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\nI got your message";

/// Write the fixed acknowledgement to the connection.
pub async fn write_ack<S>(stream: &mut S) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(ACK_RESPONSE).await?;
    stream.flush().await
}
