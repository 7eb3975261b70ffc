//! Status, history and the manual trigger of the quota reset job.
//!
//! These are side commands: they talk to their own endpoints and never touch
//! an [`crate::panel::OptionPanel`] working set.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::api::OptionBackend;
use crate::models::{QuotaResetLog, QuotaResetStatus};
use crate::panel::PanelError;

pub const DEFAULT_LOG_LIMIT: u32 = 20;
pub const MAX_LOG_LIMIT: u32 = 100;
/// How long to wait after a trigger before re-reading status and logs.
pub const REFRESH_DELAY: Duration = Duration::from_secs(2);
/// Error messages rendered per run before collapsing the rest.
pub const MAX_RENDERED_ERRORS: usize = 10;

/// Whether a manual run may be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady(String),
}

impl Readiness {
    pub fn of(status: &QuotaResetStatus) -> Self {
        if !status.db_connected {
            Self::NotReady("Database is not connected".to_string())
        } else if status.is_running {
            Self::NotReady("A quota reset is already running".to_string())
        } else {
            Self::Ready
        }
    }

    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The job was not ready; nothing was posted.
    Blocked(String),
    /// The server accepted the run. Results show up after `refresh_after`.
    Accepted {
        message: String,
        refresh_after: Duration,
    },
    /// The server refused the run.
    Rejected(String),
}

impl fmt::Display for TriggerOutcome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocked(reason) => write!(formatter, "Not triggered: {reason}"),
            Self::Accepted { message, .. } => formatter.write_str(message),
            Self::Rejected(message) => write!(formatter, "Trigger failed: {message}"),
        }
    }
}

/// Status plus recent history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaResetSnapshot {
    pub status: QuotaResetStatus,
    pub logs: Vec<QuotaResetLog>,
}

#[derive(Debug, Clone)]
pub struct QuotaResetControl<B> {
    backend: B,
}

impl<B: OptionBackend> QuotaResetControl<B> {
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn status(&self) -> Result<QuotaResetStatus, PanelError> {
        let response = self.backend.quota_reset_status().await?;
        if !response.success {
            return Err(PanelError::Server(
                response.message_or("Failed to load quota reset status"),
            ));
        }
        Ok(response.data.unwrap_or_default())
    }

    /// Most recent runs, newest first. `limit` defaults to 20 and is clamped
    /// to `1..=100`.
    pub async fn logs(&self, limit: Option<u32>) -> Result<Vec<QuotaResetLog>, PanelError> {
        let response = self.backend.quota_reset_logs(clamp_log_limit(limit)).await?;
        if !response.success {
            return Err(PanelError::Server(
                response.message_or("Failed to load quota reset logs"),
            ));
        }
        Ok(response.data.unwrap_or_default())
    }

    pub async fn snapshot(&self) -> Result<QuotaResetSnapshot, PanelError> {
        let (status, logs) = tokio::join!(self.status(), self.logs(None));
        Ok(QuotaResetSnapshot {
            status: status?,
            logs: logs?,
        })
    }

    /// Start a run now, unless a fresh status says the job is not ready.
    pub async fn trigger(&self) -> Result<TriggerOutcome, PanelError> {
        let status = self.status().await?;
        if let Readiness::NotReady(reason) = Readiness::of(&status) {
            tracing::debug!(reason = %reason, "quota reset trigger blocked");
            return Ok(TriggerOutcome::Blocked(reason));
        }

        let response = self.backend.trigger_quota_reset().await?;
        if response.success {
            tracing::info!("quota reset triggered");
            Ok(TriggerOutcome::Accepted {
                message: response.message_or("Quota reset triggered"),
                refresh_after: REFRESH_DELAY,
            })
        } else {
            let message = response.message_or("Failed to trigger quota reset");
            tracing::warn!(message = %message, "quota reset trigger rejected");
            Ok(TriggerOutcome::Rejected(message))
        }
    }

    /// [`Self::trigger`], then wait and re-read status and logs when the run
    /// was accepted.
    pub async fn trigger_and_refresh(
        &self,
    ) -> Result<(TriggerOutcome, Option<QuotaResetSnapshot>), PanelError> {
        let outcome = self.trigger().await?;
        let TriggerOutcome::Accepted { refresh_after, .. } = &outcome else {
            return Ok((outcome, None));
        };
        tokio::time::sleep(*refresh_after).await;
        let snapshot = self.snapshot().await?;
        Ok((outcome, Some(snapshot)))
    }
}

pub fn clamp_log_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT)
}

/// Error lines for one run, collapsing everything past
/// [`MAX_RENDERED_ERRORS`] into a trailing "... and N more".
pub fn error_summary(log: &QuotaResetLog) -> Vec<String> {
    let mut lines = log
        .error_messages
        .iter()
        .take(MAX_RENDERED_ERRORS)
        .cloned()
        .collect::<Vec<_>>();
    let hidden = log.error_messages.len().saturating_sub(MAX_RENDERED_ERRORS);
    if hidden > 0 {
        lines.push(format!("... and {hidden} more"));
    }
    lines
}
