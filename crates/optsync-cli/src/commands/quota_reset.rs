use optsync_core::models::{QuotaResetLog, QuotaResetStatus};
use optsync_core::quota_reset::{error_summary, Readiness, TriggerOutcome};
use optsync_core::{ClientConfig, QuotaResetControl};
use serde::Serialize;

use crate::cli::QuotaResetCommands;
use crate::commands::common::{http_backend, print_json};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct TriggerReport<'a> {
    outcome: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a QuotaResetStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logs: Option<&'a [QuotaResetLog]>,
}

pub async fn run_quota_reset(
    command: QuotaResetCommands,
    config: ClientConfig,
) -> Result<(), CliError> {
    let control = QuotaResetControl::new(http_backend(config)?);
    match command {
        QuotaResetCommands::Status { json } => {
            let status = control.status().await?;
            if json {
                return print_json(&status);
            }
            for line in format_status_lines(&status) {
                println!("{line}");
            }
        }
        QuotaResetCommands::Logs { limit, json } => {
            let logs = control.logs(limit).await?;
            if json {
                return print_json(&logs);
            }
            if logs.is_empty() {
                println!("No quota reset runs recorded");
            }
            for line in format_log_lines(&logs) {
                println!("{line}");
            }
        }
        QuotaResetCommands::Trigger { no_wait, json } => {
            let (outcome, snapshot) = if no_wait {
                (control.trigger().await?, None)
            } else {
                control.trigger_and_refresh().await?
            };

            if json {
                print_json(&TriggerReport {
                    outcome: outcome_label(&outcome),
                    message: outcome.to_string(),
                    status: snapshot.as_ref().map(|snapshot| &snapshot.status),
                    logs: snapshot.as_ref().map(|snapshot| snapshot.logs.as_slice()),
                })?;
            } else {
                println!("{outcome}");
                if let Some(snapshot) = &snapshot {
                    for line in format_status_lines(&snapshot.status) {
                        println!("{line}");
                    }
                    for line in format_log_lines(&snapshot.logs[..snapshot.logs.len().min(1)]) {
                        println!("{line}");
                    }
                }
            }

            if !matches!(outcome, TriggerOutcome::Accepted { .. }) {
                return Err(CliError::TriggerNotAccepted(outcome.to_string()));
            }
        }
    }
    Ok(())
}

const fn outcome_label(outcome: &TriggerOutcome) -> &'static str {
    match outcome {
        TriggerOutcome::Blocked(_) => "blocked",
        TriggerOutcome::Accepted { .. } => "accepted",
        TriggerOutcome::Rejected(_) => "rejected",
    }
}

pub fn format_status_lines(status: &QuotaResetStatus) -> Vec<String> {
    let readiness = match Readiness::of(status) {
        Readiness::Ready => "ready".to_string(),
        Readiness::NotReady(reason) => format!("not ready ({reason})"),
    };
    let mut lines = vec![
        format!("enabled:       {}", yes_no(status.enabled)),
        format!("weekly limit:  {}", yes_no(status.weekly_limit_enabled)),
        format!("reset time:    {}", status.reset_time),
        format!(
            "database:      {}",
            if status.db_connected {
                "connected"
            } else {
                "disconnected"
            }
        ),
        format!("running:       {}", yes_no(status.is_running)),
        format!("trigger:       {readiness}"),
    ];
    if let Some(concurrency) = status.concurrency {
        lines.insert(3, format!("concurrency:   {concurrency}"));
    }
    lines
}

pub fn format_log_lines(logs: &[QuotaResetLog]) -> Vec<String> {
    let mut lines = Vec::new();
    for log in logs {
        let executed_at = log.executed_at.map_or_else(
            || "-".to_string(),
            |time| time.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
        );
        lines.push(format!(
            "{executed_at}  users={} ok={} failed={} skipped={}  {}",
            log.total_users,
            log.success_count,
            log.failed_count,
            log.skipped_day_card,
            if log.duration.is_empty() {
                "-"
            } else {
                log.duration.as_str()
            }
        ));
        lines.extend(error_summary(log).into_iter().map(|error| format!("    {error}")));
    }
    lines
}

const fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
