use std::cell::Cell;

use mailadmin_shared::api::{GetMessagesParams, Paginated, ResourceQuery, SortOrder, UpdateMessageLabelRequest};
use mailadmin_shared::models::{Message, SystemLabel, SystemLabelEnum};
use yew::prelude::*;

use crate::components::card::Card;
use crate::components::label_badge::LabelBadge;
use crate::services::use_services;

pub const PAGE_SIZE: u32 = 10;

pub fn messages_params(page: u32, filter: &[SystemLabel]) -> GetMessagesParams {
    GetMessagesParams {
        query: ResourceQuery {
            page: Some(page),
            limit: Some(PAGE_SIZE),
            sort_by: Some("sentAt".to_string()),
            sort_order: Some(SortOrder::Desc),
        },
        system_labels: filter.to_vec(),
    }
}

/// Add `label` to the filter, or remove it if already selected.
pub fn toggle_filter(filter: &[SystemLabel], label: SystemLabel) -> Vec<SystemLabel> {
    if filter.contains(&label) {
        filter.iter().copied().filter(|l| *l != label).collect()
    } else {
        SystemLabel::ALL
            .into_iter()
            .filter(|l| *l == label || filter.contains(l))
            .collect()
    }
}

/// Numbers fetches so that only the newest one may apply its response.
#[derive(Debug, Default)]
pub struct LatestRequest {
    issued: Cell<u64>,
}

impl LatestRequest {
    pub fn issue(&self) -> u64 {
        let ticket = self.issued.get() + 1;
        self.issued.set(ticket);
        ticket
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.issued.get() == ticket
    }
}

#[derive(Properties, PartialEq)]
pub struct MessagesProps {
    #[prop_or_default]
    pub labels: Option<SystemLabelEnum>,
}

#[function_component(Messages)]
pub fn messages(props: &MessagesProps) -> Html {
    let services = use_services();
    let page = use_state(|| 1u32);
    let filter = use_state(Vec::<SystemLabel>::new);
    let result = use_state(|| None::<Paginated<Message>>);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let refresh_trigger = use_state(|| 0u32);
    let latest = use_memo((), |_| LatestRequest::default());

    {
        let services = services.clone();
        let result = result.clone();
        let loading = loading.clone();
        let error = error.clone();
        let latest = latest.clone();
        let params = messages_params(*page, &filter);

        use_effect_with((*page, (*filter).clone(), *refresh_trigger), move |_| {
            let ticket = latest.issue();
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                let response = services.messages.get_messages(&params).await;
                // A newer page or filter was requested meanwhile.
                if !latest.is_latest(ticket) {
                    return;
                }
                match response {
                    Ok(messages) => {
                        result.set(Some(messages));
                        error.set(None);
                    }
                    Err(e) => {
                        tracing::error!("Failed to fetch messages: {}", e);
                        error.set(Some(e.message));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let on_filter = {
        let filter = filter.clone();
        let page = page.clone();
        Callback::from(move |label: SystemLabel| {
            filter.set(toggle_filter(&filter, label));
            page.set(1);
        })
    };

    let on_toggle_label = {
        let services = services.clone();
        let error = error.clone();
        let refresh_trigger = refresh_trigger.clone();
        Callback::from(move |(message_id, label, is_remove): (i64, SystemLabel, bool)| {
            let services = services.clone();
            let error = error.clone();
            let refresh_trigger = refresh_trigger.clone();
            let request = UpdateMessageLabelRequest {
                message_id,
                system_label: label,
                is_remove,
            };
            wasm_bindgen_futures::spawn_local(async move {
                match services.message_labels.update_message_label(&request).await {
                    Ok(()) => refresh_trigger.set(*refresh_trigger + 1),
                    Err(e) => {
                        tracing::error!("Failed to update label of message {}: {}", message_id, e);
                        error.set(Some(e.message));
                    }
                }
            });
        })
    };

    let prev = {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| page.set((*page).saturating_sub(1).max(1)))
    };
    let next = {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| page.set(*page + 1))
    };

    let filters = html! {
        <div class="message-filters flex flex-wrap gap-2">
            { for SystemLabel::ALL.into_iter().map(|label| {
                let on_filter = on_filter.clone();
                html! {
                    <LabelBadge
                        {label}
                        labels={props.labels.clone()}
                        active={filter.contains(&label)}
                        onclick={Callback::from(move |_: MouseEvent| on_filter.emit(label))}
                    />
                }
            })}
        </div>
    };

    let body = match &*result {
        None if *loading => html! {
            <div class="loading">
                <div class="spinner"></div>
            </div>
        },
        Some(messages) if !messages.items.is_empty() => html! {
            <table class="messages-table w-full">
                <thead>
                    <tr>
                        <th>{ "Sender" }</th>
                        <th>{ "Subject" }</th>
                        <th>{ "Sent" }</th>
                        <th>{ "Labels" }</th>
                    </tr>
                </thead>
                <tbody>
                    { for messages.items.iter().map(|message| {
                        html! {
                            <tr key={message.id}>
                                <td>
                                    <div class="font-semibold">{ message.sender_name.clone() }</div>
                                    <div class="text-xs text-gray-600">{ message.sender_email.clone() }</div>
                                </td>
                                <td>{ message.subject.clone() }</td>
                                <td>{ message.sent_at.format("%d/%m/%Y %H:%M").to_string() }</td>
                                <td class="flex flex-wrap gap-1">
                                    { for SystemLabel::ALL.into_iter().map(|label| {
                                        let has = message.has_label(label);
                                        let id = message.id;
                                        let on_toggle_label = on_toggle_label.clone();
                                        html! {
                                            <LabelBadge
                                                {label}
                                                labels={props.labels.clone()}
                                                active={has}
                                                onclick={Callback::from(move |_: MouseEvent| on_toggle_label.emit((id, label, has)))}
                                            />
                                        }
                                    })}
                                </td>
                            </tr>
                        }
                    })}
                </tbody>
            </table>
        },
        _ => html! {
            <div class="empty-state">
                <p>{ "No messages found." }</p>
            </div>
        },
    };

    let pager = match &*result {
        Some(messages) if messages.total_pages > 1 => html! {
            <div class="pager mt-4 flex items-center justify-end gap-3">
                <button disabled={!messages.has_prev() || *loading} onclick={prev}>{ "Previous" }</button>
                <span>{ format!("Page {} of {}", messages.page, messages.total_pages) }</span>
                <button disabled={!messages.has_next() || *loading} onclick={next}>{ "Next" }</button>
            </div>
        },
        _ => html! {},
    };

    html! {
        <Card extra="messages p-6">
            <div class="mb-4 flex items-center justify-between">
                <h4 class="text-xl font-bold">{ "Messages" }</h4>
                if let Some(messages) = &*result {
                    <span class="text-sm text-gray-600">{ format!("{} total", messages.total) }</span>
                }
            </div>
            { filters }
            if let Some(message) = &*error {
                <div class="error-message mt-3">{ message.clone() }</div>
            }
            <div class="mt-4 overflow-x-auto">
                { body }
            </div>
            { pager }
        </Card>
    }
}
