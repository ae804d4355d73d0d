use mailadmin_shared::api::CodeRequest;
use serde::Deserialize;
use validator::Validate;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::card::Card;
use crate::router::Route;
use crate::services::use_services;

/// Query string Google appends when redirecting back.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CallbackQuery {
    /// The code to exchange, or why there is none.
    pub fn into_request(self) -> Result<CodeRequest, String> {
        if let Some(error) = self.error {
            return Err(format!("Google denied access: {}", error));
        }
        let request = CodeRequest {
            code: self.code.unwrap_or_default(),
        };
        request
            .validate()
            .map_err(|_| "Missing authorization code".to_string())?;
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum GrantStatus {
    Exchanging,
    Granted,
    Failed(String),
}

#[derive(Properties, PartialEq)]
pub struct GrantCallbackProps {
    pub on_refresh: Callback<()>,
}

#[function_component(GrantCallback)]
pub fn grant_callback(props: &GrantCallbackProps) -> Html {
    let services = use_services();
    let location = use_location();
    let status = use_state(|| GrantStatus::Exchanging);

    {
        let status = status.clone();
        let on_refresh = props.on_refresh.clone();
        let query = location
            .and_then(|location| location.query::<CallbackQuery>().ok())
            .unwrap_or_default();

        use_effect_with((), move |_| {
            match query.into_request() {
                Ok(request) => wasm_bindgen_futures::spawn_local(async move {
                    match services.grants.grant_gmail_access(&request).await {
                        Ok(()) => {
                            status.set(GrantStatus::Granted);
                            on_refresh.emit(());
                        }
                        Err(e) => {
                            tracing::error!("Failed to grant Gmail access: {}", e);
                            status.set(GrantStatus::Failed(e.message));
                        }
                    }
                }),
                Err(reason) => status.set(GrantStatus::Failed(reason)),
            }
            || ()
        });
    }

    let body = match &*status {
        GrantStatus::Exchanging => html! {
            <div class="loading">
                <div class="spinner"></div>
                <p>{ "Connecting Gmail..." }</p>
            </div>
        },
        GrantStatus::Granted => html! {
            <p class="notice success">{ "Gmail connected. Messages will sync shortly." }</p>
        },
        GrantStatus::Failed(reason) => html! {
            <p class="notice error">{ format!("Could not connect Gmail: {}", reason) }</p>
        },
    };

    html! {
        <Card extra="grant-callback p-6">
            <h4 class="text-xl font-bold">{ "Connect Gmail" }</h4>
            <div class="mt-4">{ body }</div>
            <div class="mt-6">
                <Link<Route> to={Route::Dashboard}>{ "Back to dashboard" }</Link<Route>>
            </div>
        </Card>
    }
}
