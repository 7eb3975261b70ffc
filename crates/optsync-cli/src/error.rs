use std::io;

use optsync_core::PanelError;
use thiserror::Error;

use crate::config_profiles::ProfileStoreError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] optsync_core::Error),
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Profiles(#[from] ProfileStoreError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid assignment '{0}': expected KEY=VALUE")]
    InvalidAssignment(String),
    #[error("Option '{key}' belongs to the {owner} panel, not {panel}")]
    WrongPanel {
        key: String,
        panel: String,
        owner: String,
    },
    #[error("{0} option(s) failed to save")]
    SaveFailed(usize),
    #[error("{0}")]
    TriggerNotAccepted(String),
    #[error(
        "No option store configured. Run `optsync config init --base-url <URL>` or set OPTSYNC_BASE_URL."
    )]
    NotConfigured,
}
