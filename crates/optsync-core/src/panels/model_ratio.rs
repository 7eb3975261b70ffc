use crate::api::OptionBackend;
use crate::models::{FieldSpec, PanelSchema};
use crate::panel::PanelError;

/// Per-model pricing tables, each a JSON object keyed by model name.
pub const RATIO_KEYS: [&str; 7] = [
    "ModelPrice",
    "ModelRatio",
    "CacheRatio",
    "CompletionRatio",
    "ImageRatio",
    "AudioRatio",
    "AudioCompletionRatio",
];

pub fn schema() -> PanelSchema {
    let mut fields = RATIO_KEYS
        .iter()
        .map(|key| FieldSpec::pretty_json(*key))
        .collect::<Vec<_>>();
    fields.push(FieldSpec::toggle("ExposeRatioEnabled"));
    PanelSchema::builtin("model-ratio", fields)
}

/// Restore the server's built-in ratio tables.
///
/// Bypasses the diff; callers should reload the panel afterwards.
pub async fn reset_model_ratio<B: OptionBackend>(backend: &B) -> Result<String, PanelError> {
    tracing::debug!("resetting model ratios");
    let response = backend.reset_model_ratio().await?;
    if response.success {
        tracing::info!("model ratios reset");
        Ok(response.message_or("Model ratios reset"))
    } else {
        Err(PanelError::Server(
            response.message_or("Failed to reset model ratios"),
        ))
    }
}
