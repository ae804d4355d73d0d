use mailadmin_shared::api::UpdateLabelsRequest;
use mailadmin_shared::endpoints::email::labels;
use mailadmin_shared::models::{GmailLabel, LabelMapping};

use crate::error::ApiResult;
use crate::http::{ApiClient, RequestOptions};

/// Gmail labels and their mapping onto system labels
#[derive(Debug, Clone, PartialEq)]
pub struct LabelsService {
    http: ApiClient,
}

impl LabelsService {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// Non-system labels of the connected Gmail account.
    pub async fn get_gmail_labels(&self) -> ApiResult<Vec<GmailLabel>> {
        self.http
            .get(labels::GMAIL_LABELS, RequestOptions::default())
            .await
    }

    pub async fn get_labels(&self) -> ApiResult<LabelMapping> {
        self.http.get(labels::BASE, RequestOptions::default()).await
    }

    /// Only the keys set on `request` change.
    pub async fn update_labels(&self, request: &UpdateLabelsRequest) -> ApiResult<()> {
        self.http
            .put(labels::BASE, request, RequestOptions::default())
            .await
    }

    /// Create the missing Gmail labels and return the resulting mapping.
    pub async fn auto_create_labels(&self) -> ApiResult<LabelMapping> {
        self.http
            .post::<_, ()>(labels::AUTO_CREATE, None, RequestOptions::default())
            .await
    }
}
