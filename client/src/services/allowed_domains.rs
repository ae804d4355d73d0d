use mailadmin_shared::api::UpdateAllowedDomainsRequest;
use mailadmin_shared::endpoints::email::allowed_domains;

use crate::error::ApiResult;
use crate::http::{ApiClient, RequestOptions};

/// Whitelist of sender domains that are synchronized
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedDomainsService {
    http: ApiClient,
}

impl AllowedDomainsService {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    pub async fn get_allowed_domains(&self) -> ApiResult<Vec<String>> {
        self.http
            .get(allowed_domains::BASE, RequestOptions::default())
            .await
    }

    /// Replaces the whole list.
    pub async fn update_allowed_domains(&self, request: &UpdateAllowedDomainsRequest) -> ApiResult<()> {
        self.http
            .put(allowed_domains::BASE, request, RequestOptions::default())
            .await
    }
}
