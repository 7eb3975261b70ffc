//! Concurrent per-key submission.

use tokio::task::JoinHandle;

use super::diff::OptionChange;
use crate::api::OptionBackend;
use crate::models::OptionUpdate;

/// Order in which changed keys are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitOrder {
    /// Every key in one concurrent wave.
    #[default]
    Concurrent,
    /// Keys ending in `enabled` first, then the rest. A failure in the first
    /// wave does not stop the second.
    TogglesFirst,
}

/// Which keys a save after a partial failure resubmits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Skip keys the server already confirmed with the same value.
    #[default]
    FailedOnly,
    /// Resubmit everything that differs from the baseline.
    WholeDiff,
}

/// Settled result of one key's write.
#[derive(Debug)]
pub enum WriteStatus {
    Confirmed,
    /// The server answered `success: false`.
    Rejected(String),
    /// No envelope came back.
    Failed(String),
}

#[derive(Debug)]
pub struct WriteResult {
    pub change: OptionChange,
    pub status: WriteStatus,
}

/// Send `changes` and wait for every request to settle.
///
/// Results come back in the order of `changes`, whatever the wave order.
/// Each request runs on its own task; dropping the returned future leaves
/// issued requests running.
pub async fn submit<B: OptionBackend>(
    backend: &B,
    changes: Vec<OptionChange>,
    order: SubmitOrder,
    is_switch: impl Fn(&str) -> bool,
) -> Vec<WriteResult> {
    let waves = match order {
        SubmitOrder::Concurrent => vec![changes.into_iter().enumerate().collect::<Vec<_>>()],
        SubmitOrder::TogglesFirst => {
            let (switches, rest) = changes
                .into_iter()
                .enumerate()
                .partition::<Vec<_>, _>(|(_, change)| is_switch(change.key.as_str()));
            vec![switches, rest]
        }
    };

    let mut results = Vec::new();
    for wave in waves {
        if wave.is_empty() {
            continue;
        }
        let handles = wave
            .into_iter()
            .map(|(position, change)| (position, spawn_write(backend, change)))
            .collect::<Vec<_>>();
        for (position, (change, handle)) in handles {
            let status = match handle.await {
                Ok(status) => status,
                Err(error) => WriteStatus::Failed(format!("write task aborted: {error}")),
            };
            results.push((position, WriteResult { change, status }));
        }
    }

    results.sort_by_key(|(position, _)| *position);
    results.into_iter().map(|(_, result)| result).collect()
}

fn spawn_write<B: OptionBackend>(
    backend: &B,
    change: OptionChange,
) -> (OptionChange, JoinHandle<WriteStatus>) {
    let backend = backend.clone();
    let update = OptionUpdate::new(change.key.clone(), change.wire_value.clone());
    let handle = tokio::spawn(async move {
        let key = update.key.clone();
        match backend.put_option(update).await {
            Ok(response) if response.success => WriteStatus::Confirmed,
            Ok(response) => WriteStatus::Rejected(response.message_or("Save failed")),
            Err(error) => {
                tracing::debug!(key = %key, error = %error, "option write did not complete");
                WriteStatus::Failed(format!("Request failed: {error}"))
            }
        }
    });
    (change, handle)
}
