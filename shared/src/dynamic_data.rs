//! Aggregated settings and enum metadata served by `/shared/dynamic-data`.
//!
//! The response is a sparse bag: only keys that were requested and that the
//! server could resolve are present, and each key decides the type of its
//! value. Lookups go through marker types so the key and its value type are
//! always paired.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{LabelMapping, RoleEnum, SuperEmail, SystemLabelEnum};

/// A known setting key and the type of its value.
pub trait SettingKey {
    const KEY: &'static str;
    type Value: DeserializeOwned;
}

/// A known enum path and the type of its value.
pub trait EnumPath {
    const PATH: &'static str;
    type Value: DeserializeOwned;
}

/// `email.labels`
pub struct EmailLabels;

impl SettingKey for EmailLabels {
    const KEY: &'static str = "email.labels";
    type Value = LabelMapping;
}

/// `email.superEmail`
pub struct EmailSuperEmail;

impl SettingKey for EmailSuperEmail {
    const KEY: &'static str = "email.superEmail";
    type Value = SuperEmail;
}

/// `email.lastPullAt`
pub struct EmailLastPullAt;

impl SettingKey for EmailLastPullAt {
    const KEY: &'static str = "email.lastPullAt";
    type Value = DateTime<Utc>;
}

/// `email.allowedDomains`
pub struct EmailAllowedDomains;

impl SettingKey for EmailAllowedDomains {
    const KEY: &'static str = "email.allowedDomains";
    type Value = Vec<String>;
}

/// `shared.systemLabel`
pub struct SharedSystemLabel;

impl EnumPath for SharedSystemLabel {
    const PATH: &'static str = "shared.systemLabel";
    type Value = SystemLabelEnum;
}

/// `authentication.role`
pub struct AuthenticationRole;

impl EnumPath for AuthenticationRole {
    const PATH: &'static str = "authentication.role";
    type Value = RoleEnum;
}

/// Query for the dynamic-data endpoint; both lists go out as repeated keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicDataParams {
    #[serde(default)]
    pub settings: Vec<String>,
    #[serde(default)]
    pub enums: Vec<String>,
}

impl DynamicDataParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setting<K: SettingKey>(mut self) -> Self {
        self.settings.push(K::KEY.to_string());
        self
    }

    pub fn enum_path<E: EnumPath>(mut self) -> Self {
        self.enums.push(E::PATH.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicDataResponse {
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default)]
    pub enums: Map<String, Value>,
}

impl DynamicDataResponse {
    /// Typed value of a setting, `None` when it was not returned.
    pub fn setting<K: SettingKey>(&self) -> Option<K::Value> {
        decode(K::KEY, self.settings.get(K::KEY))
    }

    /// Typed value of an enum path, `None` when absent or unresolved.
    pub fn enum_value<E: EnumPath>(&self) -> Option<E::Value> {
        decode(E::PATH, self.enums.get(E::PATH))
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: Option<&Value>) -> Option<T> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!("Ignoring malformed dynamic data entry {}: {}", key, e);
                None
            }
        },
    }
}
