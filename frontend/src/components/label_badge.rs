use mailadmin_shared::models::{SystemLabel, SystemLabelEnum};
use yew::prelude::*;

const FALLBACK_COLOR: &str = "#868CFF";

/// Display name and colour of a system label, preferring server metadata.
pub fn label_style(label: SystemLabel, labels: Option<&SystemLabelEnum>) -> (String, String) {
    match labels.and_then(|labels| labels.lang_for(label)) {
        Some(lang) => (lang.en.clone(), lang.color.clone()),
        None => (label.default_name().to_string(), FALLBACK_COLOR.to_string()),
    }
}

#[derive(Properties, PartialEq)]
pub struct LabelBadgeProps {
    pub label: SystemLabel,
    #[prop_or_default]
    pub labels: Option<SystemLabelEnum>,
    #[prop_or(true)]
    pub active: bool,
    #[prop_or_default]
    pub onclick: Option<Callback<MouseEvent>>,
}

#[function_component(LabelBadge)]
pub fn label_badge(props: &LabelBadgeProps) -> Html {
    let (name, color) = label_style(props.label, props.labels.as_ref());
    let style = if props.active {
        format!("background-color: {color}; border-color: {color}; color: white;")
    } else {
        format!("border-color: {color}; color: {color};")
    };

    html! {
        <button
            type="button"
            class={classes!("label-badge", "rounded-full", "border", "px-3", "py-1", "text-xs", "font-semibold",
                props.active.then_some("active"))}
            {style}
            disabled={props.onclick.is_none()}
            onclick={props.onclick.clone()}
        >
            { name }
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailadmin_shared::models::SystemLabelLang;
    use std::collections::BTreeMap;

    #[test]
    fn test_label_style_prefers_server_metadata() {
        let mut lang = BTreeMap::new();
        lang.insert(
            "task".to_string(),
            SystemLabelLang {
                vi: "Công việc".to_string(),
                en: "Work item".to_string(),
                color: "#01B574".to_string(),
            },
        );
        let labels = SystemLabelEnum {
            values: BTreeMap::new(),
            lang,
        };

        assert_eq!(
            label_style(SystemLabel::Task, Some(&labels)),
            ("Work item".to_string(), "#01B574".to_string())
        );
        assert_eq!(
            label_style(SystemLabel::Inquiry, Some(&labels)),
            ("Inquiry".to_string(), FALLBACK_COLOR.to_string())
        );
        assert_eq!(label_style(SystemLabel::Other, None).0, "Other");
    }
}
