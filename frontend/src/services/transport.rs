//! Browser implementations of the client seams.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use gloo::storage::{LocalStorage, Storage};
use gloo::timers::future::TimeoutFuture;
use gloo_net::http::{Method as FetchMethod, RequestBuilder};
use mailadmin_client::transport::{HttpRequest, HttpResponse, Method, Timer, TokenSource, Transport, TransportError};
use web_sys::AbortController;

const TOKEN_STORAGE_KEY: &str = "authToken";

/// `fetch` transport; dropping an in-flight send aborts the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

struct AbortOnDrop {
    controller: AbortController,
    settled: bool,
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.abort();
        }
    }
}

fn fetch_method(method: Method) -> FetchMethod {
    match method {
        Method::Get => FetchMethod::GET,
        Method::Post => FetchMethod::POST,
        Method::Put => FetchMethod::PUT,
        Method::Patch => FetchMethod::PATCH,
        Method::Delete => FetchMethod::DELETE,
    }
}

fn transport_error(e: impl std::fmt::Display) -> TransportError {
    TransportError(e.to_string())
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let controller = AbortController::new()
            .map_err(|e| TransportError(format!("AbortController unavailable: {:?}", e)))?;
        let mut guard = AbortOnDrop {
            controller,
            settled: false,
        };
        let signal = guard.controller.signal();

        let mut builder = RequestBuilder::new(request.url.as_str())
            .method(fetch_method(request.method))
            .abort_signal(Some(&signal));
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let fetch = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(transport_error)?;

        let response = fetch.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        guard.settled = true;

        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        Box::pin(TimeoutFuture::new(millis))
    }
}

/// Reads the token from localStorage on every request, falling back to the
/// token baked in at build time.
#[derive(Debug, Clone, Default)]
pub struct BrowserTokenSource {
    fallback: Option<String>,
}

impl BrowserTokenSource {
    pub fn new(fallback: Option<String>) -> Self {
        Self { fallback }
    }
}

impl TokenSource for BrowserTokenSource {
    fn token(&self) -> Option<String> {
        LocalStorage::raw()
            .get_item(TOKEN_STORAGE_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
            .or_else(|| self.fallback.clone())
    }
}
