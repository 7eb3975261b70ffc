use optsync_core::panels::reset_model_ratio;
use optsync_core::{ClientConfig, OptionBackend, OptionMap, PanelKind};
use serde::Serialize;

use crate::cli::ModelRatioCommands;
use crate::commands::common::{format_option_lines, http_backend, load_panel, print_json};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct ResetReport {
    pub message: String,
    pub values: OptionMap,
}

pub async fn run_model_ratio(
    command: ModelRatioCommands,
    config: ClientConfig,
) -> Result<(), CliError> {
    match command {
        ModelRatioCommands::Reset { json } => {
            let report = reset_and_reload(http_backend(config)?).await?;
            if json {
                return print_json(&report);
            }
            println!("{}", report.message);
            for line in format_option_lines(PanelKind::ModelRatio, &report.values, false) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

/// Reset the ratio tables, then reload the panel so the output reflects the
/// server's new values.
pub async fn reset_and_reload<B: OptionBackend>(backend: B) -> Result<ResetReport, CliError> {
    let message = reset_model_ratio(&backend).await?;
    let panel = load_panel(PanelKind::ModelRatio, backend).await?;
    Ok(ResetReport {
        message,
        values: panel.values()?.clone(),
    })
}
