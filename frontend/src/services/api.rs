use mailadmin_client::{ApiClient, ClientConfig, Services};

use crate::services::transport::{BrowserTimer, BrowserTokenSource, FetchTransport};

/// Values baked in at build time (`API_BASE_URL=... trunk build`).
fn build_env(key: &str) -> Option<String> {
    let value = match key {
        "API_BASE_URL" => option_env!("API_BASE_URL"),
        "API_TIMEOUT_MS" => option_env!("API_TIMEOUT_MS"),
        "API_TOKEN" => option_env!("API_TOKEN"),
        _ => None,
    };
    value.map(str::to_string)
}

pub fn client_config() -> ClientConfig {
    match ClientConfig::from_lookup(build_env) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid build configuration, using defaults: {}", e);
            ClientConfig::default()
        }
    }
}

/// Build the one client of the app and the services over it.
pub fn build_services() -> Services {
    let config = client_config();
    tracing::info!("API base URL: {}", config.base_url);

    let tokens = BrowserTokenSource::new(config.token.clone());
    Services::new(ApiClient::new(config, FetchTransport, BrowserTimer, tokens))
}
