use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categorization tag the system applies to ingested messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemLabel {
    ClassRegistration,
    Task,
    Inquiry,
    Other,
}

impl SystemLabel {
    pub const ALL: [SystemLabel; 4] = [
        SystemLabel::ClassRegistration,
        SystemLabel::Task,
        SystemLabel::Inquiry,
        SystemLabel::Other,
    ];

    /// Wire value, as used in query strings and JSON bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            SystemLabel::ClassRegistration => "classRegistration",
            SystemLabel::Task => "task",
            SystemLabel::Inquiry => "inquiry",
            SystemLabel::Other => "other",
        }
    }

    /// English display name used when the server did not send label metadata.
    pub fn default_name(self) -> &'static str {
        match self {
            SystemLabel::ClassRegistration => "Class registration",
            SystemLabel::Task => "Task",
            SystemLabel::Inquiry => "Inquiry",
            SystemLabel::Other => "Other",
        }
    }
}

impl fmt::Display for SystemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown system label `{0}` (expected one of classRegistration, task, inquiry, other)")]
pub struct ParseSystemLabelError(pub String);

impl FromStr for SystemLabel {
    type Err = ParseSystemLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseSystemLabelError(s.to_string()))
    }
}

/// Role values exposed by the `authentication.role` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
    Lecture,
}

/// Ingested email message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub gmail_message_id: String,
    pub header_message_id: String,
    pub thread_id: String,
    pub subject: String,
    pub sender_name: String,
    pub sender_email: String,
    pub sent_at: DateTime<Utc>,
    pub label_ids: Vec<String>,
    pub system_labels: Vec<SystemLabel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    pub fn has_label(&self, label: SystemLabel) -> bool {
        self.system_labels.contains(&label)
    }
}

/// Label on the connected Gmail account, as offered for mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmailLabel {
    pub label: String,
    pub value: String,
}

/// Mapping between system labels and Gmail label ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelMapping {
    pub class_registration: Option<String>,
    pub task: Option<String>,
    pub inquiry: Option<String>,
    pub other: Option<String>,
}

impl LabelMapping {
    pub fn get(&self, label: SystemLabel) -> Option<&str> {
        match label {
            SystemLabel::ClassRegistration => self.class_registration.as_deref(),
            SystemLabel::Task => self.task.as_deref(),
            SystemLabel::Inquiry => self.inquiry.as_deref(),
            SystemLabel::Other => self.other.as_deref(),
        }
    }

    pub fn set(&mut self, label: SystemLabel, gmail_label: Option<String>) {
        let slot = match label {
            SystemLabel::ClassRegistration => &mut self.class_registration,
            SystemLabel::Task => &mut self.task,
            SystemLabel::Inquiry => &mut self.inquiry,
            SystemLabel::Other => &mut self.other,
        };
        *slot = gmail_label;
    }

    /// System labels that have no Gmail label assigned.
    pub fn unmapped(&self) -> Vec<SystemLabel> {
        SystemLabel::ALL
            .into_iter()
            .filter(|label| self.get(*label).is_none())
            .collect()
    }
}

/// Gmail account used for syncing (`email.superEmail` setting)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperEmail {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl SuperEmail {
    /// First character of the display name, used when there is no avatar.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Translations and colour for one system label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLabelLang {
    pub vi: String,
    pub en: String,
    pub color: String,
}

/// Payload of the `shared.systemLabel` enum path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLabelEnum {
    #[serde(rename = "SystemLabel")]
    pub values: BTreeMap<String, SystemLabel>,
    #[serde(rename = "SystemLabelLang")]
    pub lang: BTreeMap<String, SystemLabelLang>,
}

impl SystemLabelEnum {
    pub fn lang_for(&self, label: SystemLabel) -> Option<&SystemLabelLang> {
        self.lang.get(label.as_str())
    }

    /// Entry describing the parent Gmail label the system labels live under.
    pub fn parent(&self) -> Option<&SystemLabelLang> {
        self.lang.get("parent")
    }
}

/// Payload of the `authentication.role` enum path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEnum {
    #[serde(rename = "Role")]
    pub values: BTreeMap<String, Role>,
}
