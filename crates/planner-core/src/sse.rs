//! Server-Sent-Events decoding for the chat stream.
//!
//! The byte stream is decoded into frames separated by a blank line, each
//! frame carrying one `data: <json>` line. Frames are turned into a pull
//! stream of [`ChatStreamEvent`]s; `done` and `error` end it.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, LocalBoxStream, Stream, StreamExt};
use planner_types::{chat::ChatStreamEvent, Result};

use crate::cancel::CancelToken;
use crate::ports::ByteStream;

const FRAME_DELIMITER: &str = "\n\n";
const DATA_PREFIX: &str = "data: ";

/// Incremental UTF-8 + frame decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    /// Trailing bytes of a character split across chunks
    partial: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk; returns every frame completed by it, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.partial.extend_from_slice(chunk);
        self.decode_partial();

        let mut frames = Vec::new();
        while let Some(idx) = self.buffer.find(FRAME_DELIMITER) {
            frames.push(self.buffer[..idx].to_string());
            self.buffer.drain(..idx + FRAME_DELIMITER.len());
        }
        frames
    }

    /// Text received but not yet terminated by a blank line.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    fn decode_partial(&mut self) {
        loop {
            match std::str::from_utf8(&self.partial) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    self.partial.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.partial[..valid]));
                    match e.error_len() {
                        // Incomplete sequence at the end: wait for the next chunk
                        None => {
                            self.partial.drain(..valid);
                            return;
                        }
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.partial.drain(..valid + len);
                        }
                    }
                }
            }
        }
    }
}

/// JSON payload of a `data:` frame, or `None` for any other frame.
pub fn frame_payload(frame: &str) -> Option<&str> {
    frame
        .trim_start()
        .strip_prefix(DATA_PREFIX)
        .map(str::trim_end)
}

struct ReaderState {
    body: Option<ByteStream>,
    decoder: SseDecoder,
    ready: VecDeque<ChatStreamEvent>,
    cancel: CancelToken,
}

impl ReaderState {
    fn ingest(&mut self, chunk: &[u8]) {
        for frame in self.decoder.push(chunk) {
            let Some(payload) = frame_payload(&frame) else {
                log::trace!("sse: skipping non-data frame");
                continue;
            };
            match ChatStreamEvent::from_json(payload) {
                Ok(Some(event)) => {
                    let terminal = event.is_terminal();
                    self.ready.push_back(event);
                    if terminal {
                        // Anything after done/error is ignored
                        return;
                    }
                }
                Ok(None) => log::debug!("sse: unrecognized event, skipped"),
                Err(e) => log::warn!("sse: failed to parse frame: {}", e),
            }
        }
    }

    /// Drop the body (releasing the underlying reader) and anything queued.
    fn close(&mut self) {
        self.body = None;
        self.ready.clear();
    }
}

/// Turn a raw SSE body into a stream of chat events.
///
/// The stream ends after a terminal event, at end of body, or once `cancel`
/// fires. A cancelled read ends the stream without an error item.
pub fn chat_events(
    body: ByteStream,
    cancel: CancelToken,
) -> LocalBoxStream<'static, Result<ChatStreamEvent>> {
    let state = ReaderState {
        body: Some(body),
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        cancel,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.cancel.is_cancelled() {
                state.close();
                return None;
            }
            if let Some(event) = state.ready.pop_front() {
                if event.is_terminal() {
                    state.close();
                }
                return Some((Ok(event), state));
            }
            let body = state.body.as_mut()?;
            match body.next().await {
                Some(Ok(chunk)) => state.ingest(&chunk),
                Some(Err(e)) => {
                    state.close();
                    if e.is_cancelled() || state.cancel.is_cancelled() {
                        return None;
                    }
                    return Some((Err(e), state));
                }
                None => {
                    if !state.decoder.pending().trim().is_empty() {
                        log::debug!("sse: stream ended with an incomplete frame");
                    }
                    state.body = None;
                }
            }
        }
    })
    .boxed_local()
}

/// An in-flight chat reply: pull events from it, or cancel it.
pub struct ChatStream {
    cancel: CancelToken,
    events: LocalBoxStream<'static, Result<ChatStreamEvent>>,
}

impl ChatStream {
    pub fn new(
        cancel: CancelToken,
        events: LocalBoxStream<'static, Result<ChatStreamEvent>>,
    ) -> Self {
        Self { cancel, events }
    }

    /// Handle for aborting the request from elsewhere (e.g. a Stop button).
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Stream for ChatStream {
    type Item = Result<ChatStreamEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_next_unpin(cx)
    }
}
