//! Wire payloads of the option store API

use chrono::{DateTime, FixedOffset};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// The `{ success, message, data }` envelope every endpoint answers with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse<T = IgnoredAny> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Message for display, with `fallback` when the server sent none.
    pub fn message_or(&self, fallback: &str) -> String {
        let message = self.message.trim();
        if message.is_empty() {
            fallback.to_string()
        } else {
            message.to_string()
        }
    }
}

impl ApiResponse<IgnoredAny> {
    /// Data-less success envelope.
    pub fn ack(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// One `{key, value}` row of the option listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub key: String,
    #[serde(deserialize_with = "value_as_string")]
    pub value: String,
}

/// Body of a single-key upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionUpdate {
    pub key: String,
    pub value: String,
}

impl OptionUpdate {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Readiness of the out-of-band quota reset job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct QuotaResetStatus {
    #[serde(default)]
    pub db_connected: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub weekly_limit_enabled: bool,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reset_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<u32>,
}

/// One execution record of the quota reset job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaResetLog {
    #[serde(default)]
    pub executed_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub failed_count: u64,
    #[serde(default)]
    pub skipped_day_card: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_messages: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn value_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn option_listing_tolerates_non_string_values() {
        let payload = r#"{
            "success": true,
            "message": "",
            "data": [
                {"key": "QuotaResetEnabled", "value": "true"},
                {"key": "QuotaResetConcurrency", "value": 5},
                {"key": "Notice", "value": null}
            ]
        }"#;
        let response: ApiResponse<Vec<OptionEntry>> = serde_json::from_str(payload).unwrap();
        let entries = response.data.unwrap();
        assert_eq!(entries[1].value, "5");
        assert_eq!(entries[2].value, "");
    }

    #[test]
    fn ack_envelope_ignores_data_and_missing_message() {
        let response: ApiResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.message_or("Save failed"), "Save failed");

        let response: ApiResponse =
            serde_json::from_str(r#"{"success":true,"message":null,"data":{"x":1}}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.message, "");
    }

    #[test]
    fn quota_reset_log_parses_offset_timestamps() {
        let payload = r#"{
            "executed_at": "2025-06-01T00:01:00.123+08:00",
            "total_users": 12,
            "success_count": 10,
            "failed_count": 1,
            "skipped_day_card": 1,
            "duration": "1.2s"
        }"#;
        let log: QuotaResetLog = serde_json::from_str(payload).unwrap();
        assert_eq!(log.total_users, 12);
        assert!(log.error_messages.is_empty());
        assert_eq!(
            log.executed_at.unwrap().to_rfc3339(),
            "2025-06-01T00:01:00.123+08:00"
        );
    }

    #[test]
    fn quota_reset_status_defaults_missing_fields() {
        let status: QuotaResetStatus =
            serde_json::from_str(r#"{"db_connected":true,"reset_time":"00:01"}"#).unwrap();
        assert!(status.db_connected);
        assert!(!status.is_running);
        assert_eq!(status.concurrency, None);
    }
}
