use std::rc::Rc;

use mailadmin_client::{SyncGate, SyncOutcome};
use mailadmin_shared::dynamic_data::{DynamicDataResponse, EmailLastPullAt, EmailSuperEmail};
use yew::prelude::*;

use crate::components::card::Card;
use crate::components::profile_card::ProfileCard;
use crate::services::use_services;

#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Idle,
    Loading,
    Success,
    Error(String),
}

impl SyncStatus {
    pub fn message(&self) -> Option<String> {
        match self {
            SyncStatus::Idle => None,
            SyncStatus::Loading => Some("Syncing emails...".to_string()),
            SyncStatus::Success => Some("Sync started. New emails will appear shortly.".to_string()),
            SyncStatus::Error(message) => Some(format!("Sync failed: {}", message)),
        }
    }

    /// Status after a trigger settles; `None` leaves the current one in place.
    pub fn after(outcome: SyncOutcome) -> Option<SyncStatus> {
        match outcome {
            SyncOutcome::Started => Some(SyncStatus::Success),
            SyncOutcome::AlreadyRunning => None,
            SyncOutcome::Failed(e) => Some(SyncStatus::Error(e.message)),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub snapshot: Option<Rc<DynamicDataResponse>>,
    pub loading: bool,
    pub on_refresh: Callback<()>,
}

#[function_component(Dashboard)]
pub fn dashboard(props: &DashboardProps) -> Html {
    let services = use_services();
    let gate = use_memo((), |_| SyncGate::new());
    let status = use_state(|| SyncStatus::Idle);

    let on_sync = {
        let services = services.clone();
        let gate = gate.clone();
        let status = status.clone();
        let on_refresh = props.on_refresh.clone();
        Callback::from(move |_: MouseEvent| {
            if gate.is_running() {
                return;
            }
            let services = services.clone();
            let gate = (*gate).clone();
            let status = status.clone();
            let on_refresh = on_refresh.clone();
            status.set(SyncStatus::Loading);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = gate.trigger(&services.messages).await;
                match &outcome {
                    SyncOutcome::Started => on_refresh.emit(()),
                    SyncOutcome::Failed(e) => tracing::error!("Failed to sync emails: {}", e),
                    SyncOutcome::AlreadyRunning => {}
                }
                if let Some(next) = SyncStatus::after(outcome) {
                    status.set(next);
                }
            });
        })
    };

    let profile = props.snapshot.as_ref().and_then(|data| data.setting::<EmailSuperEmail>());
    let last_pull_at = props.snapshot.as_ref().and_then(|data| data.setting::<EmailLastPullAt>());
    let syncing = *status == SyncStatus::Loading || gate.is_running();

    html! {
        <div class="dashboard mt-3 grid h-full grid-cols-1 gap-5 lg:grid-cols-3">
            <ProfileCard
                {profile}
                {last_pull_at}
                loading={props.loading && props.snapshot.is_none()}
            />

            <Card extra="sync-panel p-6 lg:col-span-2">
                <h4 class="text-xl font-bold">{ "Email sync" }</h4>
                <p class="mt-2 text-base text-gray-600">
                    { "Pull the latest messages from the connected Gmail mailbox." }
                </p>

                <button
                    class="sync-button mt-6 w-fit rounded-xl px-5 py-3 text-base font-medium"
                    disabled={syncing}
                    onclick={on_sync}
                >
                    { if syncing { "Syncing..." } else { "Sync now" } }
                </button>

                if let Some(message) = status.message() {
                    <p class={classes!(
                        "sync-status", "mt-4", "text-sm",
                        matches!(*status, SyncStatus::Error(_)).then_some("error"),
                        (*status == SyncStatus::Success).then_some("success")
                    )}>
                        { message }
                    </p>
                }
            </Card>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailadmin_client::ApiError;

    #[test]
    fn test_status_after_outcome() {
        assert_eq!(SyncStatus::after(SyncOutcome::Started), Some(SyncStatus::Success));
        assert_eq!(SyncStatus::after(SyncOutcome::AlreadyRunning), None);
        assert_eq!(
            SyncStatus::after(SyncOutcome::Failed(ApiError::timeout())),
            Some(SyncStatus::Error("Request timeout".to_string()))
        );
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(SyncStatus::Idle.message(), None);
        assert!(SyncStatus::Loading.message().is_some());
        assert_eq!(
            SyncStatus::Error("Forbidden resource".to_string()).message().as_deref(),
            Some("Sync failed: Forbidden resource")
        );
    }
}
