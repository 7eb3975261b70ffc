use optsync_core::panel::{OptionChange, RetryPolicy, SubmitOrder};
use optsync_core::{
    ClientConfig, OptionBackend, OptionPanel, PanelError, PanelKind, SaveOutcome, SavePolicy,
};
use serde::Serialize;

use crate::commands::common::{display_value, http_backend, load_panel, print_json};
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SetOptions {
    pub dry_run: bool,
    pub toggles_first: bool,
    pub whole_diff: bool,
    pub retries: u32,
    pub json: bool,
}

impl SetOptions {
    pub const fn policy(self) -> SavePolicy {
        SavePolicy {
            order: if self.toggles_first {
                SubmitOrder::TogglesFirst
            } else {
                SubmitOrder::Concurrent
            },
            retry: if self.whole_diff {
                RetryPolicy::WholeDiff
            } else {
                RetryPolicy::FailedOnly
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChangeItem {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SetReport {
    pub panel: String,
    pub changes: Vec<ChangeItem>,
    /// `None` for a dry run.
    pub outcome: Option<SaveOutcome>,
    pub attempts: u32,
}

/// Split `KEY=VALUE` at the first `=`. The value is kept verbatim.
pub fn parse_assignment(raw: &str) -> Result<Assignment, CliError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::InvalidAssignment(raw.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::InvalidAssignment(raw.to_string()));
    }
    Ok(Assignment {
        key: key.to_string(),
        value: value.to_string(),
    })
}

pub async fn run_set(
    kind: PanelKind,
    assignments: &[String],
    options: SetOptions,
    config: ClientConfig,
) -> Result<(), CliError> {
    let assignments = assignments
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let report = apply_assignments(kind, http_backend(config)?, &assignments, options).await?;

    if options.json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    match &report.outcome {
        Some(SaveOutcome::PartiallyFailed { failures, .. }) => {
            Err(CliError::SaveFailed(failures.len()))
        }
        _ => Ok(()),
    }
}

/// Load `kind`, apply every assignment locally, then save the diff.
pub async fn apply_assignments<B: OptionBackend>(
    kind: PanelKind,
    backend: B,
    assignments: &[Assignment],
    options: SetOptions,
) -> Result<SetReport, CliError> {
    let mut panel = load_panel(kind, backend)
        .await?
        .with_policy(options.policy());

    for assignment in assignments {
        edit_option(&mut panel, kind, assignment)?;
    }

    let changes = describe_changes(&panel, &panel.diff());
    if options.dry_run {
        panel.validate()?;
        return Ok(SetReport {
            panel: kind.to_string(),
            changes,
            outcome: None,
            attempts: 0,
        });
    }

    let mut attempts = 0;
    let outcome = loop {
        attempts += 1;
        let outcome = panel.save().await?;
        if outcome.is_success() || attempts > options.retries {
            break outcome;
        }
        tracing::info!("Retrying failed options (attempt {})", attempts + 1);
    };

    Ok(SetReport {
        panel: kind.to_string(),
        changes,
        outcome: Some(outcome),
        attempts,
    })
}

fn edit_option<B: OptionBackend>(
    panel: &mut OptionPanel<B>,
    kind: PanelKind,
    assignment: &Assignment,
) -> Result<(), CliError> {
    match panel.edit_input(&assignment.key, &assignment.value) {
        Err(PanelError::UnknownKey(key)) => match PanelKind::owning(&key) {
            Some(owner) => Err(CliError::WrongPanel {
                key,
                panel: kind.to_string(),
                owner: owner.to_string(),
            }),
            None => Err(PanelError::UnknownKey(key).into()),
        },
        other => Ok(other?),
    }
}

fn describe_changes<B: OptionBackend>(
    panel: &OptionPanel<B>,
    changes: &[OptionChange],
) -> Vec<ChangeItem> {
    changes
        .iter()
        .filter_map(|change| {
            let field = panel.schema().field(&change.key)?;
            Some(ChangeItem {
                key: change.key.clone(),
                value: display_value(field, &change.value, false),
            })
        })
        .collect()
}

fn print_report(report: &SetReport) {
    if report.changes.is_empty() {
        println!("No changes for the {} panel", report.panel);
    }
    for change in &report.changes {
        println!("~ {} = {}", change.key, change.value);
    }

    match &report.outcome {
        None => println!("Dry run: nothing was submitted"),
        Some(SaveOutcome::NothingChanged) => {}
        Some(SaveOutcome::Saved { keys }) => println!("Saved {} option(s)", keys.len()),
        Some(SaveOutcome::PartiallyFailed { saved, failures }) => {
            if !saved.is_empty() {
                println!("Saved: {}", saved.join(", "));
            }
            for failure in failures {
                eprintln!("Failed {}: {}", failure.key, failure.message);
            }
        }
    }
}
