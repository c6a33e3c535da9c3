//! HTTP client wrapper: URL building, bearer auth, envelope decoding and
//! the forced-logout side effect on expired sessions.

use std::rc::Rc;

use futures::future;
use futures::stream::{self, LocalBoxStream, StreamExt, TryStreamExt};
use planner_types::{chat::ChatStreamEvent, session::LogoutReason, PlannerError, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::auth_guard::{should_force_logout, AuthCheck};
use crate::cancel::CancelToken;
use crate::envelope::{is_success, normalize_error, ResponseBody};
use crate::ports::{HttpPort, HttpRequest, Method};
use crate::session::SessionStore;
use crate::sse::{self, ChatStream};

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";
const EVENT_STREAM: &str = "text/event-stream";

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

/// Clone-cheap; every clone shares the transport and session.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Rc<str>,
    http: Rc<dyn HttpPort>,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, http: Rc<dyn HttpPort>, session: SessionStore) -> Result<Self> {
        let base = base_url.trim_end_matches('/');
        // Validate once so every later join can only fail on the path
        Url::parse(base)?;
        Ok(Self {
            base_url: Rc::from(base),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Resolve `path` against the base URL. Absolute URLs pass through.
    pub fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)?
        } else if path.starts_with('/') {
            Url::parse(&format!("{}{}", self.base_url, path))?
        } else {
            Url::parse(&format!("{}/{}", self.base_url, path))?
        };
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn prepare(&self, path: &str, opts: &RequestOptions) -> Result<(HttpRequest, String)> {
        let url = self.build_url(path, &opts.query)?;
        let mut headers = opts.headers.clone();

        let body = match &opts.body {
            Some(RequestBody::Json(value)) => {
                if !opts.has_header("Content-Type") {
                    headers.push(("Content-Type".into(), JSON.into()));
                }
                Some(serde_json::to_string(value)?)
            }
            Some(RequestBody::Form(fields)) => {
                if !opts.has_header("Content-Type") {
                    headers.push(("Content-Type".into(), FORM.into()));
                }
                Some(
                    url::form_urlencoded::Serializer::new(String::new())
                        .extend_pairs(fields)
                        .finish(),
                )
            }
            None => {
                if !opts.has_header("Content-Type") {
                    headers.push(("Content-Type".into(), JSON.into()));
                }
                None
            }
        };
        if !opts.has_header("Accept") {
            headers.push(("Accept".into(), JSON.into()));
        }
        if let Some(token) = self.session.token() {
            headers.push(("Authorization".into(), format!("Bearer {}", token)));
        }

        let request_path = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        let req = HttpRequest {
            method: opts.method,
            url: url.into(),
            headers,
            body,
        };
        Ok((req, request_path))
    }

    /// Issue a request and return the envelope's `data` (or the raw body).
    pub async fn execute(&self, path: &str, opts: RequestOptions) -> Result<Value> {
        let (req, request_path) = self.prepare(path, &opts)?;
        let was_ever_authenticated = self.session.was_ever_authenticated();
        log::debug!("{} {}", req.method.as_str(), strip_query(&request_path));

        let response = self.http.send(req).await?;
        let body = ResponseBody::parse(&response.body);
        if is_success(response.status, &body) {
            return Ok(body.into_data());
        }
        Err(self
            .fail(&request_path, response.status, &body, was_ever_authenticated)
            .await)
    }

    pub async fn request<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> Result<T> {
        let data = self.execute(path, opts).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(path, RequestOptions::new(Method::Get)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        self.request(path, json_options(Method::Post, body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        self.request(path, json_options(Method::Put, body)?).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        self.request(path, json_options(Method::Patch, body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(path, RequestOptions::new(Method::Delete)).await?;
        Ok(())
    }

    /// Normalize a failed response and tear the session down if it expired.
    async fn fail(
        &self,
        request_path: &str,
        status: u16,
        body: &ResponseBody,
        was_ever_authenticated: bool,
    ) -> PlannerError {
        let error = normalize_error(status, body);
        let check = AuthCheck {
            status,
            body,
            was_ever_authenticated,
            path: request_path,
        };
        if should_force_logout(&check) {
            log::warn!("Session expired ({} on {})", status, strip_query(request_path));
            self.session.logout(LogoutReason::Expired).await;
        } else {
            log::debug!(
                "Request failed ({} on {}): {}",
                status,
                strip_query(request_path),
                error.message
            );
        }
        PlannerError::Api(error)
    }

    /// POST `body` to an SSE endpoint and return the event stream.
    ///
    /// Nothing is sent until the stream is first polled. The cancel token is
    /// available immediately; cancelling ends the stream without an error.
    pub fn open_chat_stream(&self, path: &str, body: Value) -> ChatStream {
        let cancel = CancelToken::new();
        let client = self.clone();
        let path = path.to_string();
        let token = cancel.clone();

        let events = stream::once(async move { client.start_stream(&path, body, token).await })
            .flat_map(|opened| match opened {
                Ok(events) => events,
                Err(e) if e.is_cancelled() => stream::empty().boxed_local(),
                Err(e) => stream::once(future::ready(Err(e))).boxed_local(),
            })
            .boxed_local();
        ChatStream::new(cancel, events)
    }

    async fn start_stream(
        &self,
        path: &str,
        body: Value,
        cancel: CancelToken,
    ) -> Result<LocalBoxStream<'static, Result<ChatStreamEvent>>> {
        if cancel.is_cancelled() {
            return Err(PlannerError::Cancelled);
        }
        let opts = RequestOptions::new(Method::Post)
            .header("Accept", EVENT_STREAM)
            .json(body);
        let (req, request_path) = self.prepare(path, &opts)?;
        let was_ever_authenticated = self.session.was_ever_authenticated();
        log::debug!("POST {} (stream)", strip_query(&request_path));

        let response = self.http.open_stream(req, cancel.clone()).await?;
        if !(200..300).contains(&response.status) {
            let bytes: Vec<u8> = response.body.try_concat().await?;
            let body = ResponseBody::parse(&String::from_utf8_lossy(&bytes));
            return Err(self
                .fail(&request_path, response.status, &body, was_ever_authenticated)
                .await);
        }
        Ok(sse::chat_events(response.body, cancel))
    }
}

fn json_options<B: Serialize + ?Sized>(method: Method, body: &B) -> Result<RequestOptions> {
    Ok(RequestOptions::new(method).json(serde_json::to_value(body)?))
}

/// Query strings can carry tokens; keep them out of logs.
fn strip_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}
