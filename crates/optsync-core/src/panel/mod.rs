//! Settings panels: load, edit locally, diff against the last synced
//! snapshot, then submit changed keys one request each.

mod batch;
mod diff;
mod error;
mod outcome;
mod state;


pub use batch::{RetryPolicy, SubmitOrder};
pub use diff::OptionChange;
pub use error::{FieldError, PanelError};
pub use outcome::{KeyFailure, Notice, NoticeLevel, SaveOutcome};
pub use state::PanelState;

use batch::WriteStatus;

use crate::api::OptionBackend;
use crate::models::{OptionMap, OptionValue, PanelSchema, ValueRejection};

/// How [`OptionPanel::save`] sends a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SavePolicy {
    pub order: SubmitOrder,
    pub retry: RetryPolicy,
}

/// One panel's client-side copy of its option keys.
///
/// `working` is what the user is editing; `baseline` is the last state the
/// server confirmed as a whole. Both always hold every declared key.
#[derive(Debug)]
pub struct OptionPanel<B> {
    schema: PanelSchema,
    backend: B,
    policy: SavePolicy,
    working: OptionMap,
    baseline: OptionMap,
    /// Values the server accepted during a save that did not fully succeed.
    confirmed: OptionMap,
    state: PanelState,
}

impl<B: OptionBackend> OptionPanel<B> {
    pub fn new(schema: PanelSchema, backend: B) -> Self {
        Self {
            schema,
            backend,
            policy: SavePolicy::default(),
            working: OptionMap::new(),
            baseline: OptionMap::new(),
            confirmed: OptionMap::new(),
            state: PanelState::Unloaded,
        }
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: SavePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub const fn schema(&self) -> &PanelSchema {
        &self.schema
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn policy(&self) -> SavePolicy {
        self.policy
    }

    pub const fn state(&self) -> PanelState {
        self.state
    }

    /// Fetch every option and replace both the working set and the baseline.
    ///
    /// On failure the panel is left exactly as it was.
    pub async fn load(&mut self) -> Result<(), PanelError> {
        tracing::debug!(panel = %self.schema.name(), "loading options");
        let response = self.backend.list_options().await?;
        if !response.success {
            return Err(PanelError::Server(
                response.message_or("Failed to load options"),
            ));
        }

        let entries = response.data.unwrap_or_default();
        let values = self.schema.coerce(&entries);
        self.baseline.clone_from(&values);
        self.working = values;
        self.confirmed.clear();
        self.transition(PanelState::Loaded);
        Ok(())
    }

    /// Reload from the server, dropping unsaved edits.
    pub async fn refresh(&mut self) -> Result<(), PanelError> {
        self.load().await
    }

    /// The working set.
    pub fn values(&self) -> Result<&OptionMap, PanelError> {
        self.ensure_loaded()?;
        Ok(&self.working)
    }

    pub fn value(&self, key: &str) -> Result<&OptionValue, PanelError> {
        self.values()?
            .get(key)
            .ok_or_else(|| PanelError::UnknownKey(key.to_string()))
    }

    /// The last snapshot the server confirmed in full.
    pub fn baseline(&self) -> Result<&OptionMap, PanelError> {
        self.ensure_loaded()?;
        Ok(&self.baseline)
    }

    pub fn is_dirty(&self) -> bool {
        !self.diff().is_empty()
    }

    /// Replace one key's working value. No request is made.
    pub fn edit(&mut self, key: &str, value: OptionValue) -> Result<(), PanelError> {
        self.ensure_loaded()?;
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| PanelError::UnknownKey(key.to_string()))?;
        field
            .check_value(&value)
            .map_err(|reason| PanelError::Rejected {
                key: key.to_string(),
                reason,
            })?;

        self.working.insert(key.to_string(), value);
        if self.state != PanelState::Editing {
            self.transition(PanelState::Editing);
        }
        Ok(())
    }

    /// Parse form-control text for `key` and apply it with [`Self::edit`].
    pub fn edit_input(&mut self, key: &str, input: &str) -> Result<(), PanelError> {
        self.ensure_loaded()?;
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| PanelError::UnknownKey(key.to_string()))?;
        let value = field
            .kind()
            .parse_input(input)
            .map_err(|message| PanelError::Rejected {
                key: key.to_string(),
                reason: ValueRejection::Invalid(message),
            })?;
        self.edit(key, value)
    }

    /// Throw away unsaved edits.
    ///
    /// Values the server accepted during an earlier partial save are kept and
    /// folded into the baseline, so the panel matches the server again.
    pub fn discard_edits(&mut self) {
        if !self.state.is_loaded() {
            return;
        }
        self.baseline.append(&mut self.confirmed);
        self.working.clone_from(&self.baseline);
        self.transition(PanelState::Loaded);
    }

    /// Keys whose working value differs from the baseline or from a value
    /// the server confirmed since, in schema order.
    pub fn diff(&self) -> Vec<OptionChange> {
        if !self.state.is_loaded() {
            return Vec::new();
        }
        diff::compute(&self.schema, &self.baseline, &self.confirmed, &self.working)
    }

    /// Check changed structured fields without submitting anything.
    pub fn validate(&self) -> Result<(), PanelError> {
        self.ensure_loaded()?;
        let errors = diff::validate(
            &self.schema,
            &self.baseline,
            &self.confirmed,
            &self.working,
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PanelError::Validation(errors))
        }
    }

    /// Submit every changed key and reconcile the baseline.
    ///
    /// The baseline only advances when every write succeeds. After a partial
    /// failure the panel is `Failed`, the diff still lists every unsaved key
    /// and calling `save` again retries per [`RetryPolicy`].
    pub async fn save(&mut self) -> Result<SaveOutcome, PanelError> {
        self.validate()?;

        let changes = self.diff();
        if changes.is_empty() {
            self.transition(PanelState::Loaded);
            return Ok(SaveOutcome::NothingChanged);
        }

        let mut already_confirmed = Vec::new();
        let mut submission = Vec::new();
        for change in changes {
            let Some(field) = self.schema.field(&change.key) else {
                continue;
            };
            if field.is_write_only() && change.value.is_blank() {
                tracing::debug!(key = %change.key, "skipping empty write-only option");
                continue;
            }
            let confirmed = self
                .confirmed
                .get(&change.key)
                .is_some_and(|value| field.canonical(value) == field.canonical(&change.value));
            if confirmed && self.policy.retry == RetryPolicy::FailedOnly {
                already_confirmed.push(change.key);
                continue;
            }
            submission.push(change);
        }

        if submission.is_empty() {
            self.adopt_working_set();
            if already_confirmed.is_empty() {
                return Ok(SaveOutcome::NothingChanged);
            }
            return Ok(SaveOutcome::Saved {
                keys: already_confirmed,
            });
        }

        self.transition(PanelState::Saving);
        tracing::debug!(
            panel = %self.schema.name(),
            keys = submission.len(),
            "submitting changed options"
        );
        let schema = &self.schema;
        let results = batch::submit(&self.backend, submission, self.policy.order, |key| {
            schema.field(key).is_some_and(crate::models::FieldSpec::is_switch)
        })
        .await;

        let mut saved = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            let key = result.change.key;
            match result.status {
                WriteStatus::Confirmed => {
                    self.confirmed.insert(key.clone(), result.change.value);
                    saved.push(key);
                }
                WriteStatus::Rejected(message) => {
                    tracing::warn!(key = %key, message = %message, "server rejected option");
                    failures.push(KeyFailure {
                        key,
                        message,
                        transport: false,
                    });
                }
                WriteStatus::Failed(message) => {
                    tracing::warn!(key = %key, error = %message, "option write failed");
                    failures.push(KeyFailure {
                        key,
                        message,
                        transport: true,
                    });
                }
            }
        }

        if failures.is_empty() {
            saved.extend(already_confirmed);
            self.adopt_working_set();
            tracing::info!(panel = %self.schema.name(), keys = saved.len(), "options saved");
            Ok(SaveOutcome::Saved { keys: saved })
        } else {
            self.transition(PanelState::Failed);
            Ok(SaveOutcome::PartiallyFailed { saved, failures })
        }
    }

    fn adopt_working_set(&mut self) {
        self.baseline.clone_from(&self.working);
        self.confirmed.clear();
        self.transition(PanelState::Loaded);
    }

    fn ensure_loaded(&self) -> Result<(), PanelError> {
        if self.state.is_loaded() {
            Ok(())
        } else {
            Err(PanelError::NotLoaded)
        }
    }

    fn transition(&mut self, next: PanelState) {
        debug_assert!(
            self.state.allows(next),
            "illegal panel transition {} -> {next}",
            self.state
        );
        if self.state != next {
            tracing::debug!(
                panel = %self.schema.name(),
                from = %self.state,
                to = %next,
                "panel state changed"
            );
        }
        self.state = next;
    }
}
