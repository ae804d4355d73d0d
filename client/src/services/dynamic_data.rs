use mailadmin_shared::dynamic_data::{DynamicDataParams, DynamicDataResponse};
use mailadmin_shared::endpoints::shared;

use crate::error::ApiResult;
use crate::http::{ApiClient, RequestOptions};

/// Batch fetch of runtime settings and enum metadata.
///
/// Sent without credentials: the endpoint only serves non-sensitive
/// configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicDataService {
    http: ApiClient,
}

impl DynamicDataService {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, params: &DynamicDataParams) -> ApiResult<DynamicDataResponse> {
        self.http
            .get(
                shared::DYNAMIC_DATA,
                RequestOptions::new().params(params).anonymous(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use mailadmin_shared::api::ApiResponse;
    use mailadmin_shared::dynamic_data::{EmailLastPullAt, EmailSuperEmail, SharedSystemLabel};
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_sparse_response_without_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shared/dynamic-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ApiResponse::ok(json!({
                "settings": {
                    "email.superEmail": { "email": "admin@school.edu.vn", "name": "Admin", "picture": "" }
                },
                "enums": { "shared.systemLabel": null }
            }))))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::new(&server.uri())
            .unwrap()
            .with_token(Some("secret".to_string()));
        let service = DynamicDataService::new(ApiClient::native(config));
        let params = DynamicDataParams::new()
            .setting::<EmailSuperEmail>()
            .setting::<EmailLastPullAt>()
            .enum_path::<SharedSystemLabel>();
        let data = service.get(&params).await.unwrap();

        assert_eq!(data.setting::<EmailSuperEmail>().unwrap().name, "Admin");
        assert!(data.setting::<EmailLastPullAt>().is_none());
        assert!(data.enum_value::<SharedSystemLabel>().is_none());

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
        let pairs: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("settings".to_string(), "email.superEmail".to_string())));
        assert!(pairs.contains(&("settings".to_string(), "email.lastPullAt".to_string())));
        assert!(pairs.contains(&("enums".to_string(), "shared.systemLabel".to_string())));
    }
}
