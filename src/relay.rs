//! Relays an upstream response back to the caller.
//!
//! Failed upstream responses are buffered and returned verbatim. Successful
//! ones are streamed through [`RelayBody`], which owns the upstream byte
//! stream: when the caller goes away the server drops the body, and with it
//! the upstream connection.

use std::{
    fmt::Display,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use bytes::{Bytes, BytesMut};
use futures::Stream;
use tracing::{debug, warn};

use crate::{error::RelayError, upstream::ACCEPT_TEXT};

/// Error bodies are expected to be small; anything past this is dropped.
pub const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

pub async fn relay_response(mut upstream: reqwest::Response) -> Result<Response, RelayError> {
    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(ACCEPT_TEXT));

    if !status.is_success() {
        let mut body = BytesMut::new();
        while let Some(chunk) = upstream.chunk().await? {
            let room = MAX_ERROR_BODY_BYTES - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if body.len() == MAX_ERROR_BODY_BYTES {
                break;
            }
        }
        warn!(%status, bytes = body.len(), "upstream returned an error");
        return Ok((
            status,
            [(header::CONTENT_TYPE, content_type)],
            body.freeze(),
        )
            .into_response());
    }

    debug!(%status, "streaming upstream response");
    let stream = RelayBody::new(Box::pin(upstream.bytes_stream()));
    Ok((
        status,
        [(header::CONTENT_TYPE, content_type)],
        Body::from_stream(stream),
    )
        .into_response())
}

/// Lazily forwards chunks from an upstream byte stream.
///
/// Dropping it before the stream has ended (client disconnect, server
/// shutdown) drops the inner stream and with it the upstream connection.
pub struct RelayBody<S> {
    inner: S,
    chunks: usize,
    bytes: usize,
    finished: bool,
}

impl<S> RelayBody<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            chunks: 0,
            bytes: 0,
            finished: false,
        }
    }
}

impl<S, E> Stream for RelayBody<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    type Item = Result<Bytes, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        loop {
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    this.chunks += 1;
                    this.bytes += chunk.len();
                    return Poll::Ready(Some(Ok(chunk)));
                }
                Poll::Ready(Some(Err(err))) => {
                    warn!(error = %err, chunks = this.chunks, "upstream stream failed mid-response");
                    this.finished = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    debug!(chunks = this.chunks, bytes = this.bytes, "upstream stream complete");
                    this.finished = true;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl<S> Drop for RelayBody<S> {
    fn drop(&mut self) {
        if !self.finished {
            debug!(
                chunks = self.chunks,
                bytes = self.bytes,
                "relay body dropped before upstream finished, releasing upstream connection"
            );
        }
    }
}
