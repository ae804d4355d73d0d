//! Generic API client.
//!
//! Resolves endpoints against the base URL, serializes query parameters,
//! attaches default headers and the bearer token, races every request against
//! a timeout, and unwraps the `{ success, statusCode, data }` envelope into
//! either `data` or an [`ApiError`].

use std::rc::Rc;
use std::time::Duration;

use futures::future::{self, Either};
use mailadmin_shared::api::ApiErrorResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::transport::{HttpRequest, HttpResponse, Method, Timer, TokenSource, Transport};

/// Per-request options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    params: Option<Result<Value, String>>,
    requires_auth: bool,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            params: None,
            requires_auth: true,
            timeout: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query parameters; top-level fields of `params` become query entries.
    pub fn params<P: Serialize + ?Sized>(mut self, params: &P) -> Self {
        self.params = Some(serde_json::to_value(params).map_err(|e| e.to_string()));
        self
    }

    /// Send without the `Authorization` header.
    pub fn anonymous(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

struct Inner {
    config: ClientConfig,
    transport: Box<dyn Transport>,
    timer: Box<dyn Timer>,
    tokens: Box<dyn TokenSource>,
}

/// Cheap to clone; clones share one transport and configuration.
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("timeout", &self.inner.config.timeout)
            .finish()
    }
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        transport: impl Transport + 'static,
        timer: impl Timer + 'static,
        tokens: impl TokenSource + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                config,
                transport: Box::new(transport),
                timer: Box::new(timer),
                tokens: Box::new(tokens),
            }),
        }
    }

    /// reqwest + tokio client using the configured static token.
    #[cfg(feature = "native")]
    pub fn native(config: ClientConfig) -> Self {
        let tokens = crate::transport::StaticToken(config.token.clone());
        Self::new(
            config,
            crate::transport::ReqwestTransport::default(),
            crate::transport::TokioTimer,
            tokens,
        )
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn build_url(&self, endpoint: &str, params: Option<&Value>) -> ApiResult<Url> {
        // Endpoints are relative to the base path, which may carry a prefix such as `/api`.
        let mut base = self.inner.config.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut url = base
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| ApiError::transport(format!("Invalid endpoint {}: {}", endpoint, e)))?;

        let pairs = params.map(query_pairs).unwrap_or_default();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    fn build_headers(&self, requires_auth: bool, custom: &[(String, String)]) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        for (name, value) in custom {
            upsert_header(&mut headers, name, value.clone());
        }

        if requires_auth {
            if let Some(token) = self.inner.tokens.token() {
                upsert_header(&mut headers, "Authorization", format!("Bearer {}", token));
            }
        }
        headers
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<String>,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let result = self.execute(method, endpoint, body, options).await;
        if let Err(err) = &result {
            tracing::warn!(
                "{} {} failed ({}): {}",
                method,
                endpoint,
                err.status_code,
                err.message
            );
        }
        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<String>,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let params = options.params.transpose().map_err(ApiError::transport)?;
        let url = self.build_url(endpoint, params.as_ref())?;
        let headers = self.build_headers(options.requires_auth, &options.headers);
        let timeout = options.timeout.unwrap_or(self.inner.config.timeout);

        tracing::debug!("{} {}", method, url);
        let response = self
            .send_with_timeout(
                HttpRequest {
                    method,
                    url,
                    headers,
                    body,
                },
                timeout,
            )
            .await?;

        handle_response(response)
    }

    async fn send_with_timeout(&self, request: HttpRequest, timeout: Duration) -> ApiResult<HttpResponse> {
        let send = self.inner.transport.send(request);
        let expired = self.inner.timer.sleep(timeout);

        match future::select(send, expired).await {
            Either::Left((result, _)) => result.map_err(ApiError::from),
            Either::Right(((), in_flight)) => {
                // Dropping the transport future aborts the request.
                drop(in_flight);
                Err(ApiError::timeout())
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> ApiResult<T> {
        self.request(Method::Get, endpoint, None, options).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: Option<&B>, options: RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body.map(encode_body).transpose()?;
        self.request(Method::Post, endpoint, body, options).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B, options: RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.request(Method::Put, endpoint, Some(body), options).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B, options: RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.request(Method::Patch, endpoint, Some(body), options).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> ApiResult<T> {
        self.request(Method::Delete, endpoint, None, options).await
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<String> {
    serde_json::to_string(body).map_err(|e| ApiError::transport(format!("Failed to serialize request: {}", e)))
}

fn upsert_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    match headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(name)) {
        Some(existing) => existing.1 = value,
        None => headers.push((name.to_string(), value)),
    }
}

/// Flatten a parameter object into query pairs.
///
/// Arrays become one entry per element under the same key; nulls are
/// skipped; anything that is not an object yields no pairs.
pub fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = params else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().filter_map(stringify).map(|item| (key.clone(), item)));
            }
            other => {
                if let Some(item) = stringify(other) {
                    pairs.push((key.clone(), item));
                }
            }
        }
    }
    pairs
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

fn handle_response<T: DeserializeOwned>(response: HttpResponse) -> ApiResult<T> {
    let value: Value = serde_json::from_str(&response.body)
        .map_err(|_| ApiError::malformed(response.status, "Invalid JSON response from server"))?;

    let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !response.is_success() || !success {
        let body = serde_json::from_value::<ApiErrorResponse>(value).unwrap_or_default();
        return Err(ApiError::from_envelope(response.status, body));
    }

    let data = match value {
        Value::Object(mut envelope) => envelope.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    serde_json::from_value(data).map_err(|e| {
        ApiError::malformed(response.status, format!("Unexpected response payload: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use mailadmin_shared::api::{ApiResponse, FieldError};
    use serde_json::json;
    use std::time::Instant;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> ApiClient {
        let config = ClientConfig::new(&server.uri())
            .unwrap()
            .with_token(Some("test-token".to_string()));
        ApiClient::native(config)
    }

    #[test]
    fn test_query_pairs_repeats_array_keys() {
        let pairs = query_pairs(&json!({ "k": ["a", "b"] }));
        assert_eq!(
            pairs,
            vec![
                ("k".to_string(), "a".to_string()),
                ("k".to_string(), "b".to_string())
            ]
        );
    }

    #[test]
    fn test_query_pairs_skips_nulls() {
        let mut pairs = query_pairs(&json!({ "page": 2, "search": null, "active": true }));
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("active".to_string(), "true".to_string()),
                ("page".to_string(), "2".to_string())
            ]
        );
        assert!(query_pairs(&json!(["not", "an", "object"])).is_empty());
    }

    #[test]
    fn test_handle_response_unwraps_data() {
        let response = HttpResponse {
            status: 200,
            body: json!({ "success": true, "statusCode": 200, "data": { "id": 3 } }).to_string(),
        };
        let data: Value = handle_response(response).unwrap();
        assert_eq!(data, json!({ "id": 3 }));
    }

    #[test]
    fn test_handle_response_missing_data_is_unit() {
        let response = HttpResponse {
            status: 200,
            body: json!({ "success": true, "statusCode": 200 }).to_string(),
        };
        let unit: ApiResult<()> = handle_response(response);
        assert!(unit.is_ok());
    }

    #[test]
    fn test_handle_response_wrong_payload_shape() {
        let response = HttpResponse {
            status: 200,
            body: json!({ "success": true, "statusCode": 200, "data": "text" }).to_string(),
        };
        let err = handle_response::<Vec<String>>(response).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedResponse);
        assert_eq!(err.status_code, 200);
    }

    #[tokio::test]
    async fn test_get_returns_data_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/email/allowedDomains"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(ApiResponse::ok(json!({ "domains": ["a.vn"] }))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let data: Value = client
            .get("/email/allowedDomains", RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(data, json!({ "domains": ["a.vn"] }));
    }

    #[tokio::test]
    async fn test_array_params_are_repeated_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/email/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ApiResponse::ok(json!([]))))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let params = json!({ "k": ["a", "b"], "missing": null });
        let _: Value = client
            .get("/email/messages", RequestOptions::new().params(&params))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let query = requests[0].url.query().unwrap_or_default().to_string();
        assert_eq!(query, "k=a&k=b");
        assert!(!query.contains("missing"));
        assert!(!query.contains("%5B"));
        assert!(!query.contains(','));
    }

    #[tokio::test]
    async fn test_validation_error_is_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/email/grants"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "success": false,
                "statusCode": 422,
                "message": "Validation failed",
                "errors": [{ "field": "email", "message": ["invalid"] }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .post::<(), _>("/email/grants", Some(&json!({ "code": "x" })), RequestOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Application);
        assert_eq!(err.status_code, 422);
        assert_eq!(err.message, "Validation failed");
        assert_eq!(
            err.errors,
            Some(vec![FieldError {
                field: "email".to_string(),
                message: vec!["invalid".to_string()],
            }])
        );
    }

    #[tokio::test]
    async fn test_success_false_with_ok_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "statusCode": 409,
                "message": "Sync already running"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get::<Value>("/email/labels", RequestOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code, 409);
        assert_eq!(err.message, "Sync already running");
    }

    #[tokio::test]
    async fn test_invalid_json_carries_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get::<Value>("/email/labels", RequestOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedResponse);
        assert_eq!(err.status_code, 502);
        assert_eq!(err.message, "Invalid JSON response from server");
    }

    #[tokio::test]
    async fn test_bearer_token_and_default_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer test-token"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ApiResponse::ok(json!(null))))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .get::<()>("/email/labels", RequestOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_anonymous_request_omits_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ApiResponse::ok(json!(null))))
            .mount(&server)
            .await;

        client_for(&server)
            .get::<()>(
                "/shared/dynamic-data",
                RequestOptions::new().anonymous().header("X-Trace", "1"),
            )
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
        assert_eq!(requests[0].headers.get("x-trace").unwrap(), "1");
    }

    #[tokio::test]
    async fn test_missing_token_sends_anonymous_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ApiResponse::ok(json!(null))))
            .mount(&server)
            .await;

        let client = ApiClient::native(ClientConfig::new(&server.uri()).unwrap());
        client
            .get::<()>("/email/labels", RequestOptions::default())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_custom_header_overrides_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(header("content-type", "application/merge-patch+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ApiResponse::ok(json!(null))))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .put::<(), _>(
                "/email/labels",
                &json!({ "task": null }),
                RequestOptions::new().header("content-type", "application/merge-patch+json"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_timeout_aborts_before_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/email/messages/sync"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ApiResponse::ok(json!(null)))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let started = Instant::now();
        let err = client
            .post::<(), ()>(
                "/email/messages/sync",
                None,
                RequestOptions::new().timeout(Duration::from_millis(100)),
            )
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.status_code, 408);
        assert!(started.elapsed() < Duration::from_secs(2));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_configured_timeout_is_the_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ApiResponse::ok(json!(null)))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig::new(&server.uri())
            .unwrap()
            .with_timeout(Duration::from_millis(50));
        let err = ApiClient::native(config)
            .get::<()>("/email/labels", RequestOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_network_failure_has_status_zero() {
        let client = ApiClient::native(ClientConfig::new("http://127.0.0.1:1").unwrap());
        let err = client
            .get::<Value>("/email/labels", RequestOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.status_code, 0);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_build_url_resolves_against_base() {
        let client = ApiClient::native(ClientConfig::new("https://api.example.com").unwrap());
        let url = client
            .build_url("/email/messages/5", Some(&json!({ "systemLabels": ["task", "other"] })))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/email/messages/5?systemLabels=task&systemLabels=other"
        );

        let bare = client.build_url("/email/labels", None).unwrap();
        assert_eq!(bare.as_str(), "https://api.example.com/email/labels");
    }

    #[test]
    fn test_build_url_keeps_base_path_prefix() {
        for base in ["https://host.example/api", "https://host.example/api/"] {
            let client = ApiClient::native(ClientConfig::new(base).unwrap());
            assert_eq!(
                client.build_url("/email/messages", None).unwrap().as_str(),
                "https://host.example/api/email/messages"
            );
            assert_eq!(
                client.build_url("shared/dynamic-data", None).unwrap().as_str(),
                "https://host.example/api/shared/dynamic-data"
            );
        }
    }
}
