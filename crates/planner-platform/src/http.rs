//! `fetch()` transport.
//!
//! Uses gloo-net for request building. Streaming responses read the
//! `ReadableStream` body chunk by chunk; a `CancelToken` aborts the request
//! through an `AbortController`.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use gloo_net::http::{Request, RequestBuilder, Response};
use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, ReadableStream, ReadableStreamDefaultReader};

use planner_core::cancel::CancelToken;
use planner_core::ports::{ByteStream, HttpPort, HttpRequest, HttpResponse, Method, StreamingResponse};
use planner_types::{PlannerError, Result};

use crate::js;

#[derive(Debug, Default)]
pub struct FetchHttp;

impl FetchHttp {
    pub fn new() -> Self {
        Self
    }
}

fn builder(req: &HttpRequest) -> RequestBuilder {
    let builder = match req.method {
        Method::Get => Request::get(&req.url),
        Method::Post => Request::post(&req.url),
        Method::Put => Request::put(&req.url),
        Method::Patch => Request::patch(&req.url),
        Method::Delete => Request::delete(&req.url),
    };
    req.headers
        .iter()
        .fold(builder, |b, (name, value)| b.header(name, value))
}

fn finish(builder: RequestBuilder, body: Option<String>) -> Result<Request> {
    match body {
        Some(body) => builder.body(body),
        None => builder.build(),
    }
    .map_err(|e| PlannerError::Network(e.to_string()))
}

fn transport_error(e: gloo_net::Error, cancel: Option<&CancelToken>) -> PlannerError {
    if cancel.is_some_and(CancelToken::is_cancelled) {
        return PlannerError::Cancelled;
    }
    match e {
        gloo_net::Error::JsError(err) if js::is_abort(&err.name) => PlannerError::Cancelled,
        other => PlannerError::Network(other.to_string()),
    }
}

#[async_trait(?Send)]
impl HttpPort for FetchHttp {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
        let request = finish(builder(&req), req.body.clone())?;
        let response = request.send().await.map_err(|e| transport_error(e, None))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PlannerError::Network(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }

    async fn open_stream(&self, req: HttpRequest, cancel: CancelToken) -> Result<StreamingResponse> {
        let controller = AbortController::new().map_err(|e| {
            let (_, message) = js::describe(e);
            PlannerError::JsInterop(message)
        })?;
        let signal = controller.signal();
        cancel.on_cancel(move || controller.abort());

        let request = finish(builder(&req).abort_signal(Some(&signal)), req.body.clone())?;
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, Some(&cancel)))?;
        let status = response.status();
        Ok(StreamingResponse {
            status,
            body: read_body(response, cancel),
        })
    }
}

/// Releases the browser reader when the stream is dropped early.
struct BodyReader {
    reader: ReadableStreamDefaultReader,
    finished: bool,
}

impl Drop for BodyReader {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.reader.cancel();
        }
    }
}

fn read_body(response: Response, cancel: CancelToken) -> ByteStream {
    let Some(body) = response.body() else {
        return stream::empty().boxed_local();
    };
    let reader = body_reader(&body);
    let state = BodyReader {
        reader,
        finished: false,
    };

    stream::unfold(state, move |mut state| {
        let cancel = cancel.clone();
        async move {
            if state.finished {
                return None;
            }
            match JsFuture::from(state.reader.read()).await {
                Ok(result) => match read_chunk(&result) {
                    Ok(Some(chunk)) => Some((Ok(chunk), state)),
                    Ok(None) => {
                        state.finished = true;
                        None
                    }
                    Err(e) => {
                        state.finished = true;
                        Some((Err(e), state))
                    }
                },
                Err(e) => {
                    state.finished = true;
                    let (name, message) = js::describe(e);
                    if cancel.is_cancelled() || js::is_abort(&name) {
                        Some((Err(PlannerError::Cancelled), state))
                    } else {
                        Some((Err(PlannerError::Network(message)), state))
                    }
                }
            }
        }
    })
    .boxed_local()
}

fn body_reader(body: &ReadableStream) -> ReadableStreamDefaultReader {
    body.get_reader().unchecked_into::<ReadableStreamDefaultReader>()
}

/// Decode one `{done, value}` read result. `Ok(None)` at end of body.
fn read_chunk(result: &JsValue) -> Result<Option<Vec<u8>>> {
    let done = Reflect::get(result, &JsValue::from_str("done"))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(true);
    if done {
        return Ok(None);
    }
    let value = Reflect::get(result, &JsValue::from_str("value")).map_err(|e| {
        let (_, message) = js::describe(e);
        PlannerError::JsInterop(message)
    })?;
    Ok(Some(Uint8Array::new(&value).to_vec()))
}
