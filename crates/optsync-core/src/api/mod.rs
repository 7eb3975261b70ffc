//! Option store backends.
//!
//! [`OptionBackend`] is the HTTP contract the panels consume. The production
//! implementation is [`HttpOptionBackend`].

mod http;
#[cfg(test)]
pub(crate) mod memory;

use std::future::Future;

use crate::error::Result;
use crate::models::{ApiResponse, OptionEntry, OptionUpdate, QuotaResetLog, QuotaResetStatus};

pub use http::HttpOptionBackend;

pub const OPTIONS_PATH: &str = "/options";
pub const RESET_MODEL_RATIO_PATH: &str = "/options/reset-model-ratio";
pub const QUOTA_RESET_STATUS_PATH: &str = "/quota-reset/status";
pub const QUOTA_RESET_LOGS_PATH: &str = "/quota-reset/logs";
pub const QUOTA_RESET_TRIGGER_PATH: &str = "/quota-reset/trigger";

/// Access to a server-side key/value option table.
///
/// `Err` means the request never produced an envelope (transport failure);
/// server-reported failures come back as `Ok` with `success == false`.
/// Implementations are cloned into spawned tasks for concurrent writes.
pub trait OptionBackend: Clone + Send + Sync + 'static {
    /// `GET /options`
    fn list_options(&self) -> impl Future<Output = Result<ApiResponse<Vec<OptionEntry>>>> + Send;

    /// `PUT /options`, one key per call.
    fn put_option(&self, update: OptionUpdate) -> impl Future<Output = Result<ApiResponse>> + Send;

    /// `POST /options/reset-model-ratio`
    fn reset_model_ratio(&self) -> impl Future<Output = Result<ApiResponse>> + Send;

    /// `GET /quota-reset/status`
    fn quota_reset_status(
        &self,
    ) -> impl Future<Output = Result<ApiResponse<QuotaResetStatus>>> + Send;

    /// `GET /quota-reset/logs?limit=N`
    fn quota_reset_logs(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<ApiResponse<Vec<QuotaResetLog>>>> + Send;

    /// `POST /quota-reset/trigger`
    fn trigger_quota_reset(&self) -> impl Future<Output = Result<ApiResponse>> + Send;
}
