use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use optsync_core::models::FieldSpec;
use optsync_core::util::normalize_text_option;
use optsync_core::{
    ClientConfig, HttpOptionBackend, OptionBackend, OptionMap, OptionPanel, OptionValue, PanelKind,
};

use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub const BASE_URL_ENV: &str = "OPTSYNC_BASE_URL";
pub const ACCESS_TOKEN_ENV: &str = "OPTSYNC_ACCESS_TOKEN";

const MASK: &str = "********";

/// Connection settings from one source (flags or environment).
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConnectionOverrides {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var(BASE_URL_ENV).ok(),
            access_token: env::var(ACCESS_TOKEN_ENV).ok(),
            timeout_secs: None,
        }
    }
}

/// Resolve where to connect: flags, then environment, then the profile.
pub fn resolve_client_config(
    flags: ConnectionOverrides,
    profile_name: Option<&str>,
) -> Result<ClientConfig, CliError> {
    let config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(profile_name);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    tracing::debug!("Using CLI profile '{}'", profile_name);
    merge_client_config(flags, ConnectionOverrides::from_env(), &profile)
}

pub fn merge_client_config(
    flags: ConnectionOverrides,
    environment: ConnectionOverrides,
    profile: &CliProfile,
) -> Result<ClientConfig, CliError> {
    let base_url = normalize_text_option(flags.base_url)
        .or_else(|| normalize_text_option(environment.base_url))
        .or_else(|| profile.base_url())
        .ok_or(CliError::NotConfigured)?;
    let access_token = normalize_text_option(flags.access_token)
        .or_else(|| normalize_text_option(environment.access_token))
        .or_else(|| profile.access_token());
    let timeout = flags
        .timeout_secs
        .or(environment.timeout_secs)
        .or(profile.request_timeout_secs)
        .map(Duration::from_secs);

    Ok(ClientConfig::new(base_url)?
        .with_access_token(access_token)
        .with_request_timeout(timeout))
}

pub fn http_backend(config: ClientConfig) -> Result<HttpOptionBackend, CliError> {
    Ok(HttpOptionBackend::new(config)?)
}

pub async fn load_panel<B: OptionBackend>(
    kind: PanelKind,
    backend: B,
) -> Result<OptionPanel<B>, CliError> {
    let mut panel = OptionPanel::new(kind.schema(), backend);
    panel.load().await?;
    Ok(panel)
}

/// Human-readable value; secrets are masked unless `reveal` is set.
pub fn display_value(field: &FieldSpec, value: &OptionValue, reveal: bool) -> String {
    if field.is_sensitive() && !reveal {
        return if value.is_blank() {
            String::new()
        } else {
            MASK.to_string()
        };
    }
    match value {
        OptionValue::Text(text) if text.contains('\n') => {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        }
        other => other.to_string(),
    }
}

pub fn format_option_lines(kind: PanelKind, values: &OptionMap, reveal: bool) -> Vec<String> {
    let schema = kind.schema();
    let width = schema.keys().map(str::len).max().unwrap_or(0);
    schema
        .fields()
        .iter()
        .filter_map(|field| {
            let value = values.get(field.key())?;
            Some(format!(
                "{:<width$}  {}",
                field.key(),
                display_value(field, value, reveal)
            ))
        })
        .collect()
}

/// JSON object of a panel's values, with secrets masked unless `reveal`.
pub fn options_to_json(
    kind: PanelKind,
    values: &OptionMap,
    reveal: bool,
) -> Result<BTreeMap<String, serde_json::Value>, CliError> {
    let schema = kind.schema();
    let mut output = BTreeMap::new();
    for field in schema.fields() {
        let Some(value) = values.get(field.key()) else {
            continue;
        };
        let rendered = if field.is_sensitive() && !reveal && !value.is_blank() {
            serde_json::Value::String(MASK.to_string())
        } else {
            serde_json::to_value(value)?
        };
        output.insert(field.key().to_string(), rendered);
    }
    Ok(output)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
