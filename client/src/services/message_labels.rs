use mailadmin_shared::api::UpdateMessageLabelRequest;
use mailadmin_shared::endpoints::email::message_labels;

use crate::error::ApiResult;
use crate::http::{ApiClient, RequestOptions};

#[derive(Debug, Clone, PartialEq)]
pub struct MessageLabelsService {
    http: ApiClient,
}

impl MessageLabelsService {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// Add or remove one system label on one message; the server mirrors the
    /// change onto the Gmail labels. Concurrent updates to the same message
    /// are last-write-wins.
    pub async fn update_message_label(&self, request: &UpdateMessageLabelRequest) -> ApiResult<()> {
        self.http
            .put(message_labels::UPDATE, request, RequestOptions::default())
            .await
    }
}
