use serde::Serialize;

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// One user-visible message produced by a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A key whose write did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyFailure {
    pub key: String,
    /// Server message verbatim, or the transport error text.
    pub message: String,
    /// `true` when the request never produced a response envelope.
    pub transport: bool,
}

/// Result of [`super::OptionPanel::save`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// No key differed from the baseline; no request was made.
    NothingChanged,
    /// Every submitted key was confirmed.
    Saved { keys: Vec<String> },
    /// At least one key failed. The baseline was not advanced.
    PartiallyFailed {
        saved: Vec<String>,
        failures: Vec<KeyFailure>,
    },
}

impl SaveOutcome {
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::PartiallyFailed { .. })
    }

    /// Notices in the order a console would show them: a single notice on
    /// success, one per failed key otherwise.
    pub fn notices(&self) -> Vec<Notice> {
        match self {
            Self::NothingChanged => vec![Notice::warning("Nothing changed")],
            Self::Saved { .. } => vec![Notice::success("Saved")],
            Self::PartiallyFailed { failures, .. } => failures
                .iter()
                .map(|failure| Notice::error(failure.message.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_failure_emits_one_notice_per_failed_key() {
        let outcome = SaveOutcome::PartiallyFailed {
            saved: vec!["A".to_string()],
            failures: vec![
                KeyFailure {
                    key: "B".to_string(),
                    message: "invalid value".to_string(),
                    transport: false,
                },
                KeyFailure {
                    key: "C".to_string(),
                    message: "Request failed: timeout".to_string(),
                    transport: true,
                },
            ],
        };
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.notices(),
            vec![
                Notice::error("invalid value"),
                Notice::error("Request failed: timeout"),
            ]
        );
    }

    #[test]
    fn success_emits_a_single_notice() {
        let outcome = SaveOutcome::Saved {
            keys: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(outcome.notices(), vec![Notice::success("Saved")]);
        assert_eq!(
            SaveOutcome::NothingChanged.notices()[0].level,
            NoticeLevel::Warning
        );
    }

    #[test]
    fn outcome_serializes_with_a_tag() {
        let json = serde_json::to_value(SaveOutcome::Saved {
            keys: vec!["A".to_string()],
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "saved", "keys": ["A"]}));
    }
}
