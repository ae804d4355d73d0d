use mailadmin_shared::api::{GetMessagesParams, Paginated};
use mailadmin_shared::endpoints::email::messages;
use mailadmin_shared::models::Message;

use crate::error::ApiResult;
use crate::http::{ApiClient, RequestOptions};

/// Email message operations
#[derive(Debug, Clone, PartialEq)]
pub struct MessagesService {
    http: ApiClient,
}

impl MessagesService {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// Ask the server to start pulling mail from Gmail. Returns once the sync
    /// has been accepted, not when it has finished. Requires the admin role.
    pub async fn sync_emails(&self) -> ApiResult<()> {
        self.http
            .post::<(), ()>(messages::SYNC, None, RequestOptions::default())
            .await
    }

    /// Paginated list, optionally filtered by system label.
    pub async fn get_messages(&self, params: &GetMessagesParams) -> ApiResult<Paginated<Message>> {
        self.http
            .get(messages::BASE, RequestOptions::new().params(params))
            .await
    }

    pub async fn get_message_by_id(&self, id: i64) -> ApiResult<Message> {
        self.http
            .get(&messages::by_id(id), RequestOptions::default())
            .await
    }
}
