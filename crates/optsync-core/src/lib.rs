//! optsync-core - Core library for Optsync
//!
//! This crate contains the option schemas, the HTTP option store backend and
//! the diff-and-batch-save panel used by every Optsync front end.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod panel;
pub mod panels;
pub mod quota_reset;
pub mod util;

pub use api::{HttpOptionBackend, OptionBackend};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::{FieldSpec, OptionMap, OptionValue, PanelSchema};
pub use panel::{OptionPanel, PanelError, PanelState, SaveOutcome, SavePolicy};
pub use panels::PanelKind;
pub use quota_reset::QuotaResetControl;
