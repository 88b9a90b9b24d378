//! Length-prefixed frame IO
//!
//! `len:u32_be || body`, body capped at 1 MiB. Oversize frames are a
//! protocol violation: the caller closes the stream. Generic over any
//! `AsyncRead`/`AsyncWrite` stream so the transport stays pluggable.

use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::error::{ExchangeError, ExchangeResult};
use crate::messages::Frame;
use crate::MAX_FRAME_BYTES;

/// Read one frame body within the timeout
pub async fn read_frame<S>(stream: &mut S, limit: Duration) -> ExchangeResult<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let body = timeout(limit, async {
        let mut header = [0u8; 4];
        read_all(stream, &mut header).await?;
        let length = u32::from_be_bytes(header) as usize;
        if length > MAX_FRAME_BYTES {
            return Err(ExchangeError::OversizeFrame(length));
        }
        let mut body = vec![0u8; length];
        read_all(stream, &mut body).await?;
        Ok(body)
    })
    .await
    .map_err(|_| ExchangeError::Timeout("frame read".into()))??;

    Ok(body)
}

/// Write one frame within the timeout
pub async fn write_frame<S>(stream: &mut S, body: &[u8], limit: Duration) -> ExchangeResult<()>
where
    S: AsyncWrite + Unpin,
{
    if body.len() > MAX_FRAME_BYTES {
        return Err(ExchangeError::OversizeFrame(body.len()));
    }
    timeout(limit, async {
        let header = (body.len() as u32).to_be_bytes();
        stream.write_all(&header).await?;
        stream.write_all(body).await?;
        stream.flush().await?;
        Ok::<_, ExchangeError>(())
    })
    .await
    .map_err(|_| ExchangeError::Timeout("frame write".into()))??;

    Ok(())
}

/// Read and decode one message frame
pub async fn read_message<S>(stream: &mut S, limit: Duration) -> ExchangeResult<Frame>
where
    S: AsyncRead + Unpin,
{
    let body = read_frame(stream, limit).await?;
    Frame::from_cbor(&body)
}

/// Encode and write one message frame
pub async fn write_message<S>(stream: &mut S, frame: &Frame, limit: Duration) -> ExchangeResult<()>
where
    S: AsyncWrite + Unpin,
{
    let body = frame.to_cbor()?;
    write_frame(stream, &body, limit).await
}

async fn read_all<S>(stream: &mut S, buf: &mut [u8]) -> ExchangeResult<()>
where
    S: AsyncRead + Unpin,
{
    match stream.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(ExchangeError::PeerClosed),
        Err(e) => Err(ExchangeError::Io(e)),
    }
}
