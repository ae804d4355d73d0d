use mailadmin_shared::api::CodeRequest;
use mailadmin_shared::endpoints::email::grants;

use crate::error::ApiResult;
use crate::http::{ApiClient, RequestOptions};

/// Gmail OAuth grant flow.
///
/// Step one returns the Google consent URL; Google redirects back with a
/// one-time code which step two exchanges for stored credentials. Nothing is
/// kept on the client between the two steps.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantsService {
    http: ApiClient,
}

impl GrantsService {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    pub async fn get_gmail_auth_url(&self) -> ApiResult<String> {
        self.http.get(grants::BASE, RequestOptions::default()).await
    }

    pub async fn grant_gmail_access(&self, request: &CodeRequest) -> ApiResult<()> {
        self.http
            .post(grants::BASE, Some(request), RequestOptions::default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use mailadmin_shared::api::ApiResponse;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_two_step_grant() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/email/grants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ApiResponse::ok(
                "https://accounts.google.com/o/oauth2/v2/auth?client_id=abc",
            )))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/email/grants"))
            .and(body_json(json!({ "code": "4/0AX" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(ApiResponse::ok(json!(null))))
            .expect(1)
            .mount(&server)
            .await;

        let service = GrantsService::new(ApiClient::native(ClientConfig::new(&server.uri()).unwrap()));
        let url = service.get_gmail_auth_url().await.unwrap();
        assert!(url.starts_with("https://accounts.google.com/"));

        service
            .grant_gmail_access(&CodeRequest {
                code: "4/0AX".to_string(),
            })
            .await
            .unwrap();
    }
}
