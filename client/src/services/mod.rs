//! Domain services: thin, stateless wrappers pairing an endpoint with its
//! request and response types. Errors pass through untouched.

mod allowed_domains;
mod dynamic_data;
mod grants;
mod labels;
mod message_labels;
mod messages;

pub use allowed_domains::AllowedDomainsService;
pub use dynamic_data::DynamicDataService;
pub use grants::GrantsService;
pub use labels::LabelsService;
pub use message_labels::MessageLabelsService;
pub use messages::MessagesService;

use crate::http::ApiClient;

/// Every service, built over one shared client.
#[derive(Debug, Clone, PartialEq)]
pub struct Services {
    pub messages: MessagesService,
    pub message_labels: MessageLabelsService,
    pub labels: LabelsService,
    pub allowed_domains: AllowedDomainsService,
    pub grants: GrantsService,
    pub dynamic_data: DynamicDataService,
}

impl Services {
    pub fn new(http: ApiClient) -> Self {
        Self {
            messages: MessagesService::new(http.clone()),
            message_labels: MessageLabelsService::new(http.clone()),
            labels: LabelsService::new(http.clone()),
            allowed_domains: AllowedDomainsService::new(http.clone()),
            grants: GrantsService::new(http.clone()),
            dynamic_data: DynamicDataService::new(http),
        }
    }
}
