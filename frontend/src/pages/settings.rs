use mailadmin_shared::api::{UpdateAllowedDomainsRequest, UpdateLabelsRequest};
use mailadmin_shared::models::{GmailLabel, LabelMapping, SystemLabel};
use validator::Validate;
use web_sys::{HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::card::Card;
use crate::services::use_services;

/// Only the labels whose mapping changed, with cleared ones sent as `null`.
pub fn mapping_changes(saved: &LabelMapping, edited: &LabelMapping) -> UpdateLabelsRequest {
    SystemLabel::ALL
        .into_iter()
        .filter(|label| saved.get(*label) != edited.get(*label))
        .fold(UpdateLabelsRequest::default(), |request, label| {
            request.set(label, edited.get(label).map(str::to_string))
        })
}

/// One domain per line; blank lines dropped.
pub fn parse_domains(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().to_ascii_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    fn view(&self) -> Html {
        match self {
            Notice::Success(message) => html! { <p class="notice success mt-3 text-sm">{ message.clone() }</p> },
            Notice::Error(message) => html! { <p class="notice error mt-3 text-sm">{ message.clone() }</p> },
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct SettingsProps {
    pub on_refresh: Callback<()>,
}

#[function_component(Settings)]
pub fn settings(props: &SettingsProps) -> Html {
    let services = use_services();
    let gmail_labels = use_state(Vec::<GmailLabel>::new);
    let saved = use_state(LabelMapping::default);
    let edited = use_state(LabelMapping::default);
    let domains_text = use_state(String::new);
    let labels_notice = use_state(|| None::<Notice>);
    let domains_notice = use_state(|| None::<Notice>);
    let busy = use_state(|| false);

    {
        let services = services.clone();
        let gmail_labels = gmail_labels.clone();
        let saved = saved.clone();
        let edited = edited.clone();
        let domains_text = domains_text.clone();
        let labels_notice = labels_notice.clone();

        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match services.labels.get_gmail_labels().await {
                    Ok(labels) => gmail_labels.set(labels),
                    Err(e) => {
                        tracing::error!("Failed to fetch Gmail labels: {}", e);
                        labels_notice.set(Some(Notice::Error(e.message)));
                    }
                }
                match services.labels.get_labels().await {
                    Ok(mapping) => {
                        saved.set(mapping.clone());
                        edited.set(mapping);
                    }
                    Err(e) => tracing::error!("Failed to fetch label mapping: {}", e),
                }
                match services.allowed_domains.get_allowed_domains().await {
                    Ok(domains) => domains_text.set(domains.join("\n")),
                    Err(e) => tracing::error!("Failed to fetch allowed domains: {}", e),
                }
            });
            || ()
        });
    }

    let on_select = {
        let edited = edited.clone();
        Callback::from(move |(label, value): (SystemLabel, String)| {
            let mut mapping = (*edited).clone();
            mapping.set(label, (!value.is_empty()).then_some(value));
            edited.set(mapping);
        })
    };

    let on_save_labels = {
        let services = services.clone();
        let saved = saved.clone();
        let edited = edited.clone();
        let labels_notice = labels_notice.clone();
        let busy = busy.clone();
        let on_refresh = props.on_refresh.clone();
        Callback::from(move |_: MouseEvent| {
            let request = mapping_changes(&saved, &edited);
            if request.is_empty() {
                labels_notice.set(Some(Notice::Success("Nothing to save.".to_string())));
                return;
            }
            let services = services.clone();
            let saved = saved.clone();
            let mapping = (*edited).clone();
            let labels_notice = labels_notice.clone();
            let busy = busy.clone();
            let on_refresh = on_refresh.clone();
            busy.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match services.labels.update_labels(&request).await {
                    Ok(()) => {
                        saved.set(mapping);
                        labels_notice.set(Some(Notice::Success("Label mapping saved.".to_string())));
                        on_refresh.emit(());
                    }
                    Err(e) => {
                        tracing::error!("Failed to update labels: {}", e);
                        labels_notice.set(Some(Notice::Error(e.message)));
                    }
                }
                busy.set(false);
            });
        })
    };

    let on_auto_create = {
        let services = services.clone();
        let gmail_labels = gmail_labels.clone();
        let saved = saved.clone();
        let edited = edited.clone();
        let labels_notice = labels_notice.clone();
        let busy = busy.clone();
        let on_refresh = props.on_refresh.clone();
        Callback::from(move |_: MouseEvent| {
            let services = services.clone();
            let gmail_labels = gmail_labels.clone();
            let saved = saved.clone();
            let edited = edited.clone();
            let labels_notice = labels_notice.clone();
            let busy = busy.clone();
            let on_refresh = on_refresh.clone();
            busy.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match services.labels.auto_create_labels().await {
                    Ok(mapping) => {
                        saved.set(mapping.clone());
                        edited.set(mapping);
                        labels_notice.set(Some(Notice::Success("Missing labels created.".to_string())));
                        // New labels now exist in Gmail.
                        if let Ok(labels) = services.labels.get_gmail_labels().await {
                            gmail_labels.set(labels);
                        }
                        on_refresh.emit(());
                    }
                    Err(e) => {
                        tracing::error!("Failed to auto-create labels: {}", e);
                        labels_notice.set(Some(Notice::Error(e.message)));
                    }
                }
                busy.set(false);
            });
        })
    };

    let on_domains_input = {
        let domains_text = domains_text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            domains_text.set(input.value());
        })
    };

    let on_save_domains = {
        let services = services.clone();
        let domains_text = domains_text.clone();
        let domains_notice = domains_notice.clone();
        let busy = busy.clone();
        let on_refresh = props.on_refresh.clone();
        Callback::from(move |_: MouseEvent| {
            let request = UpdateAllowedDomainsRequest {
                domains: parse_domains(&domains_text),
            };
            if request.validate().is_err() {
                domains_notice.set(Some(Notice::Error(
                    "Enter at least one domain, each only once.".to_string(),
                )));
                return;
            }
            let services = services.clone();
            let domains_notice = domains_notice.clone();
            let busy = busy.clone();
            let on_refresh = on_refresh.clone();
            busy.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match services.allowed_domains.update_allowed_domains(&request).await {
                    Ok(()) => {
                        domains_notice.set(Some(Notice::Success("Allowed domains saved.".to_string())));
                        on_refresh.emit(());
                    }
                    Err(e) => {
                        tracing::error!("Failed to update allowed domains: {}", e);
                        domains_notice.set(Some(Notice::Error(e.message)));
                    }
                }
                busy.set(false);
            });
        })
    };

    let on_connect = {
        let services = services.clone();
        let labels_notice = labels_notice.clone();
        Callback::from(move |_: MouseEvent| {
            let services = services.clone();
            let labels_notice = labels_notice.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match services.grants.get_gmail_auth_url().await {
                    Ok(url) => {
                        if let Err(e) = gloo::utils::window().location().set_href(&url) {
                            tracing::error!("Failed to navigate to Google consent page: {:?}", e);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to get Gmail authorization URL: {}", e);
                        labels_notice.set(Some(Notice::Error(e.message)));
                    }
                }
            });
        })
    };

    html! {
        <div class="settings mt-3 grid grid-cols-1 gap-5 lg:grid-cols-2">
            <Card extra="p-6">
                <div class="flex items-center justify-between">
                    <h4 class="text-xl font-bold">{ "Label mapping" }</h4>
                    <button class="connect-gmail" onclick={on_connect}>{ "Connect Gmail" }</button>
                </div>
                <p class="mt-2 text-sm text-gray-600">
                    { "Choose the Gmail label each system label is written to." }
                </p>

                <div class="mt-4 flex flex-col gap-3">
                    { for SystemLabel::ALL.into_iter().map(|label| {
                        let on_select = on_select.clone();
                        let onchange = Callback::from(move |e: Event| {
                            let select: HtmlSelectElement = e.target_unchecked_into();
                            on_select.emit((label, select.value()));
                        });
                        let current = edited.get(label).unwrap_or_default().to_string();
                        html! {
                            <label class="flex items-center justify-between gap-4">
                                <span class="font-medium">{ label.default_name() }</span>
                                <select {onchange}>
                                    <option value="" selected={current.is_empty()}>{ "Not mapped" }</option>
                                    { for gmail_labels.iter().map(|gmail| html! {
                                        <option value={gmail.value.clone()} selected={gmail.value == current}>
                                            { gmail.label.clone() }
                                        </option>
                                    })}
                                </select>
                            </label>
                        }
                    })}
                </div>

                <div class="mt-5 flex gap-3">
                    <button disabled={*busy} onclick={on_save_labels}>{ "Save mapping" }</button>
                    <button disabled={*busy} onclick={on_auto_create}>{ "Auto-create labels" }</button>
                </div>
                { (*labels_notice).as_ref().map(Notice::view).unwrap_or_default() }
            </Card>

            <Card extra="p-6">
                <h4 class="text-xl font-bold">{ "Allowed domains" }</h4>
                <p class="mt-2 text-sm text-gray-600">
                    { "Only mail from these domains is imported. One domain per line." }
                </p>
                <textarea
                    class="mt-4 h-48 w-full rounded-xl border p-3 font-mono text-sm"
                    value={(*domains_text).clone()}
                    oninput={on_domains_input}
                />
                <div class="mt-5">
                    <button disabled={*busy} onclick={on_save_domains}>{ "Save domains" }</button>
                </div>
                { (*domains_notice).as_ref().map(Notice::view).unwrap_or_default() }
            </Card>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_changes_only_sends_diff() {
        let saved = LabelMapping {
            class_registration: Some("Label_1".to_string()),
            task: Some("Label_2".to_string()),
            inquiry: None,
            other: None,
        };
        let mut edited = saved.clone();
        edited.set(SystemLabel::Task, None);
        edited.set(SystemLabel::Inquiry, Some("Label_3".to_string()));

        let request = mapping_changes(&saved, &edited);
        assert_eq!(request.class_registration, None);
        assert_eq!(request.task, Some(None));
        assert_eq!(request.inquiry, Some(Some("Label_3".to_string())));
        assert_eq!(request.other, None);
    }

    #[test]
    fn test_mapping_changes_empty_when_unchanged() {
        let saved = LabelMapping::default();
        assert!(mapping_changes(&saved, &saved.clone()).is_empty());
    }

    #[test]
    fn test_parse_domains() {
        assert_eq!(
            parse_domains("  Example.edu \n\nstudent.example.edu\n"),
            vec!["example.edu", "student.example.edu"]
        );
        assert!(parse_domains("\n \n").is_empty());
    }

    #[test]
    fn test_duplicate_domains_fail_validation() {
        let request = UpdateAllowedDomainsRequest {
            domains: parse_domains("example.edu\nEXAMPLE.edu"),
        };
        assert!(request.validate().is_err());
    }
}
