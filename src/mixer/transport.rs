//! One request/response exchange with the mixer over TCP
//!
//! The mixer replies with a single JSON document and does not delimit it, so
//! the reply is complete as soon as the bytes received so far parse as one
//! JSON value (or the mixer closes the connection).

use std::time::Duration;

use bytes::BytesMut;
use serde_json::{Deserializer, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::MixerError;

const READ_CHUNK: usize = 4096;

/// Open a connection, write `payload`, read one JSON reply, close.
pub async fn exchange(
    host: &str,
    port: u16,
    payload: &[u8],
    max_response: usize,
    deadline: Duration,
) -> Result<Value, MixerError> {
    let addr = format!("{}:{}", host, port);

    let mut stream = timeout(deadline, TcpStream::connect(&addr))
        .await
        .map_err(|_| MixerError::Timeout)?
        .map_err(|source| MixerError::ConnectionFailed {
            addr: addr.clone(),
            source,
        })?;

    timeout(deadline, async {
        stream.write_all(payload).await?;
        stream.flush().await
    })
    .await
    .map_err(|_| MixerError::Timeout)?
    .map_err(MixerError::SendFailed)?;

    let reply = timeout(deadline, read_reply(&mut stream, max_response))
        .await
        .map_err(|_| MixerError::Timeout)??;

    // Dropping the stream closes the connection.
    Ok(reply)
}

async fn read_reply(stream: &mut TcpStream, max_response: usize) -> Result<Value, MixerError> {
    let mut buf = BytesMut::with_capacity(READ_CHUNK);

    loop {
        buf.reserve(READ_CHUNK);
        let n = stream
            .read_buf(&mut buf)
            .await
            .map_err(MixerError::ReceiveFailed)?;

        if n == 0 {
            if buf.iter().all(u8::is_ascii_whitespace) {
                return Err(MixerError::EmptyResponse);
            }
            return Ok(serde_json::from_slice(&buf)?);
        }

        if buf.len() > max_response {
            return Err(MixerError::ResponseTooLarge(max_response));
        }

        if let Some(value) = try_parse(&buf)? {
            return Ok(value);
        }
    }
}

/// `Ok(None)` while the document is still incomplete
fn try_parse(buf: &[u8]) -> Result<Option<Value>, MixerError> {
    let mut iter = Deserializer::from_slice(buf).into_iter::<Value>();
    match iter.next() {
        Some(Ok(value)) => Ok(Some(value)),
        Some(Err(e)) if e.is_eof() => Ok(None),
        Some(Err(e)) => Err(MixerError::Json(e)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_document_needs_more_data() {
        assert!(try_parse(br#"{"error": nu"#).unwrap().is_none());
        assert!(try_parse(b"   ").unwrap().is_none());
    }

    #[test]
    fn test_complete_document() {
        let value = try_parse(br#"{"error": null}"#).unwrap().unwrap();
        assert_eq!(value, json!({"error": null}));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(matches!(try_parse(b"<html>"), Err(MixerError::Json(_))));
    }
}
