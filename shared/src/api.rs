use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::SystemLabel;

// ============================================================================
// Response Envelope
// ============================================================================

/// Successful response wrapper returned by every backend endpoint.
///
/// The client unwraps this and hands only `data` to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status_code: u16,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            status_code: 200,
            data,
            message: None,
        }
    }
}

/// Failure response wrapper.
///
/// Every field is optional on the way in so that a non-conforming error body
/// still yields something usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ApiErrorResponse {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: Some(status_code),
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Per-field validation messages reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: Vec<String>,
}

// ============================================================================
// Pagination
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Generic paging and sorting query parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// `ceil(total / limit)`, zero when `limit` is zero, saturating at `u32::MAX`.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
}

impl<T: Clone> Paginated<T> {
    /// Slice one page (1-based) out of a complete result set.
    pub fn from_slice(all: &[T], page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let start = (page as usize - 1).saturating_mul(limit as usize);
        let items = all
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();
        Self {
            items,
            total: all.len() as u64,
            page,
            limit,
            total_pages: total_pages(all.len() as u64, limit),
        }
    }
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

// ============================================================================
// Email API Types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMessagesParams {
    #[serde(flatten)]
    pub query: ResourceQuery,
    #[serde(default)]
    pub system_labels: Vec<SystemLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageLabelRequest {
    pub message_id: i64,
    pub system_label: SystemLabel,
    pub is_remove: bool,
}

/// Partial label mapping update.
///
/// `None` leaves a mapping untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLabelsRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub class_registration: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub task: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub inquiry: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub other: Option<Option<String>>,
}

impl UpdateLabelsRequest {
    pub fn set(mut self, label: SystemLabel, gmail_label: Option<String>) -> Self {
        let slot = match label {
            SystemLabel::ClassRegistration => &mut self.class_registration,
            SystemLabel::Task => &mut self.task,
            SystemLabel::Inquiry => &mut self.inquiry,
            SystemLabel::Other => &mut self.other,
        };
        *slot = Some(gmail_label);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.class_registration.is_none()
            && self.task.is_none()
            && self.inquiry.is_none()
            && self.other.is_none()
    }
}

// A key that is present maps to `Some`, even when its value is null.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateAllowedDomainsRequest {
    #[validate(length(min = 1), custom = "unique_domains")]
    pub domains: Vec<String>,
}

#[allow(clippy::ptr_arg)]
fn unique_domains(domains: &Vec<String>) -> Result<(), validator::ValidationError> {
    let mut seen = HashSet::new();
    if domains
        .iter()
        .all(|domain| seen.insert(domain.trim().to_ascii_lowercase()))
    {
        Ok(())
    } else {
        Err(validator::ValidationError::new("unique"))
    }
}

/// One-time OAuth authorization code from the Google redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CodeRequest {
    #[validate(length(min = 1))]
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_total_pages_saturates() {
        assert_eq!(total_pages(u64::MAX, 1), u32::MAX);
        assert_eq!(total_pages(u64::from(u32::MAX) + 1, 1), u32::MAX);
        assert_eq!(total_pages(u64::from(u32::MAX), 1), u32::MAX);
    }

    #[test]
    fn test_paginated_from_slice() {
        let all: Vec<u32> = (1..=25).collect();
        let page = Paginated::from_slice(&all, 2, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_prev());

        let last = Paginated::from_slice(&all, 3, 10);
        assert_eq!(last.items.len(), 5);
        assert!(!last.has_next());
    }

    #[test]
    fn test_paginated_wire_format() {
        let json = serde_json::json!({
            "items": ["a"],
            "total": 1,
            "page": 1,
            "limit": 10,
            "totalPages": 1
        });
        let page: Paginated<String> = serde_json::from_value(json).unwrap();
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_update_labels_partial_serialization() {
        let request = UpdateLabelsRequest::default()
            .set(SystemLabel::Task, Some("Label_9".to_string()))
            .set(SystemLabel::Other, None);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({ "task": "Label_9", "other": null }));
    }

    #[test]
    fn test_update_labels_distinguishes_null_from_absent() {
        let parsed: UpdateLabelsRequest =
            serde_json::from_str(r#"{"inquiry": null, "task": "Label_1"}"#).unwrap();
        assert_eq!(parsed.inquiry, Some(None));
        assert_eq!(parsed.task, Some(Some("Label_1".to_string())));
        assert_eq!(parsed.other, None);
        assert!(!parsed.is_empty());
    }

    #[test]
    fn test_get_messages_params_flattened() {
        let params = GetMessagesParams {
            query: ResourceQuery {
                page: Some(2),
                limit: Some(10),
                sort_order: Some(SortOrder::Desc),
                ..Default::default()
            },
            system_labels: vec![SystemLabel::Task, SystemLabel::Inquiry],
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["page"], 2);
        assert_eq!(value["sortOrder"], "DESC");
        assert_eq!(value["sortBy"], serde_json::Value::Null);
        assert_eq!(value["systemLabels"], serde_json::json!(["task", "inquiry"]));
    }

    #[test]
    fn test_allowed_domains_validation() {
        let ok = UpdateAllowedDomainsRequest {
            domains: vec!["school.edu.vn".to_string(), "gmail.com".to_string()],
        };
        assert!(ok.validate().is_ok());

        let empty = UpdateAllowedDomainsRequest { domains: vec![] };
        assert!(empty.validate().is_err());

        let duplicated = UpdateAllowedDomainsRequest {
            domains: vec!["gmail.com".to_string(), "Gmail.com".to_string()],
        };
        assert!(duplicated.validate().is_err());
    }

    #[test]
    fn test_error_response_tolerates_missing_fields() {
        let parsed: ApiErrorResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(parsed.status_code, None);
        assert_eq!(parsed.message, None);
    }
}
