use optsync_core::{ClientConfig, PanelKind};

use crate::commands::common::{
    format_option_lines, http_backend, load_panel, options_to_json, print_json,
};
use crate::error::CliError;

pub async fn run_show(
    kind: PanelKind,
    reveal: bool,
    json: bool,
    config: ClientConfig,
) -> Result<(), CliError> {
    let panel = load_panel(kind, http_backend(config)?).await?;
    let values = panel.values()?;

    if json {
        return print_json(&options_to_json(kind, values, reveal)?);
    }

    println!("[{kind}]");
    for line in format_option_lines(kind, values, reveal) {
        println!("{line}");
    }
    Ok(())
}
