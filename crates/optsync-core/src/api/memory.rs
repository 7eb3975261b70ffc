//! In-memory option store used by unit tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};

use super::OptionBackend;
use crate::error::{Error, Result};
use crate::models::{ApiResponse, OptionEntry, OptionUpdate, QuotaResetLog, QuotaResetStatus};

#[derive(Debug, Default)]
pub struct MemoryState {
    pub options: BTreeMap<String, String>,
    /// Keys whose writes answer `success: false` with this message.
    pub rejected_keys: HashMap<String, String>,
    /// Keys whose writes fail before reaching the server.
    pub unreachable_keys: HashSet<String>,
    pub list_failure: Option<String>,
    pub list_unreachable: bool,
    pub writes: Vec<OptionUpdate>,
    pub list_calls: usize,
    pub reset_ratio_calls: usize,
    pub status: QuotaResetStatus,
    pub status_calls: usize,
    pub logs: Vec<QuotaResetLog>,
    pub log_limits: Vec<u32>,
    pub trigger_calls: usize,
    pub trigger_failure: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn with_options(pairs: &[(&str, &str)]) -> Self {
        let backend = Self::default();
        backend.update(|state| {
            for (key, value) in pairs {
                state.options.insert((*key).to_string(), (*value).to_string());
            }
        });
        backend
    }

    pub fn update(&self, apply: impl FnOnce(&mut MemoryState)) {
        apply(&mut self.inner.lock().unwrap());
    }

    pub fn read<R>(&self, inspect: impl FnOnce(&MemoryState) -> R) -> R {
        inspect(&self.inner.lock().unwrap())
    }

    /// Keys written so far, sorted.
    pub fn written_keys(&self) -> Vec<String> {
        let mut keys = self.read(|state| {
            state
                .writes
                .iter()
                .map(|write| write.key.clone())
                .collect::<Vec<_>>()
        });
        keys.sort();
        keys
    }

    pub fn write_count(&self) -> usize {
        self.read(|state| state.writes.len())
    }

    pub fn clear_writes(&self) {
        self.update(|state| state.writes.clear());
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.read(|state| state.options.get(key).cloned())
    }
}

impl OptionBackend for MemoryBackend {
    fn list_options(&self) -> impl Future<Output = Result<ApiResponse<Vec<OptionEntry>>>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            let mut state = inner.lock().unwrap();
            state.list_calls += 1;
            if state.list_unreachable {
                return Err(Error::Status("HTTP 502".to_string()));
            }
            if let Some(message) = &state.list_failure {
                return Ok(ApiResponse::failure(message.clone()));
            }
            let entries = state
                .options
                .iter()
                .map(|(key, value)| OptionEntry {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect();
            Ok(ApiResponse::ok(entries))
        }
    }

    fn put_option(&self, update: OptionUpdate) -> impl Future<Output = Result<ApiResponse>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            let mut state = inner.lock().unwrap();
            state.writes.push(update.clone());
            if state.unreachable_keys.contains(&update.key) {
                return Err(Error::Status(format!(
                    "connection reset while saving {}",
                    update.key
                )));
            }
            if let Some(message) = state.rejected_keys.get(&update.key) {
                return Ok(ApiResponse::failure(message.clone()));
            }
            state.options.insert(update.key, update.value);
            Ok(ApiResponse::ack(""))
        }
    }

    fn reset_model_ratio(&self) -> impl Future<Output = Result<ApiResponse>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            let mut state = inner.lock().unwrap();
            state.reset_ratio_calls += 1;
            state.options.remove("ModelRatio");
            Ok(ApiResponse::ack("Model ratios reset"))
        }
    }

    fn quota_reset_status(
        &self,
    ) -> impl Future<Output = Result<ApiResponse<QuotaResetStatus>>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            let mut state = inner.lock().unwrap();
            state.status_calls += 1;
            Ok(ApiResponse::ok(state.status.clone()))
        }
    }

    fn quota_reset_logs(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<ApiResponse<Vec<QuotaResetLog>>>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            let mut state = inner.lock().unwrap();
            state.log_limits.push(limit);
            let take = usize::try_from(limit).unwrap_or(usize::MAX);
            Ok(ApiResponse::ok(
                state.logs.iter().take(take).cloned().collect(),
            ))
        }
    }

    fn trigger_quota_reset(&self) -> impl Future<Output = Result<ApiResponse>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            let mut state = inner.lock().unwrap();
            state.trigger_calls += 1;
            if let Some(message) = &state.trigger_failure {
                return Ok(ApiResponse::failure(message.clone()));
            }
            state.status.is_running = true;
            Ok(ApiResponse::ack("Quota reset triggered"))
        }
    }
}
