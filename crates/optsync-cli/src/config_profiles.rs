//! Named connection profiles stored in `<config_dir>/optsync/cli-config.json`.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use optsync_core::util::{normalize_text_option, remove_trailing_slash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_DIR_NAME: &str = "optsync";
const CONFIG_FILE_NAME: &str = "cli-config.json";
const FALLBACK_PROFILE: &str = "default";
pub const PROFILE_ENV: &str = "OPTSYNC_PROFILE";

#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("Could not locate a configuration directory for this user")]
    NoConfigDir,
    #[error("Cannot access profile file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Profile file {} is not valid JSON: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Every profile plus which one is active.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

/// Where one option store lives and how to authenticate against it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

const fn current_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, ProfileStoreError> {
    let base = dirs::config_dir().ok_or(ProfileStoreError::NoConfigDir)?;
    Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn clean_name(name: Option<&str>) -> Option<String> {
    normalize_text_option(name.map(str::to_string))
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, ProfileStoreError> {
        Self::load_from_path(&default_config_path()?)
    }

    /// A missing file is an empty configuration.
    pub fn load_from_path(path: &Path) -> Result<Self, ProfileStoreError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ProfileStoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Self =
            serde_json::from_str(&raw).map_err(|source| ProfileStoreError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.cleaned())
    }

    pub fn save(&self) -> Result<PathBuf, ProfileStoreError> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ProfileStoreError> {
        let io_error = |source: io::Error| ProfileStoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let serialized = serde_json::to_string_pretty(&self.clone().cleaned()).map_err(|source| {
            ProfileStoreError::Malformed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, serialized).map_err(io_error)
    }

    /// Explicit name, then `OPTSYNC_PROFILE`, then the active profile.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        let from_env = std::env::var(PROFILE_ENV).ok();
        self.resolve_profile_name_with_env(explicit, from_env.as_deref())
    }

    pub fn resolve_profile_name_with_env(
        &self,
        explicit: Option<&str>,
        from_env: Option<&str>,
    ) -> String {
        [explicit, from_env, self.active_profile.as_deref()]
            .into_iter()
            .find_map(clean_name)
            .unwrap_or_else(|| FALLBACK_PROFILE.to_string())
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn cleaned(mut self) -> Self {
        self.active_profile = clean_name(self.active_profile.as_deref());
        self.profiles = self
            .profiles
            .into_iter()
            .map(|(name, profile)| (name, profile.cleaned()))
            .collect();
        self
    }
}

impl CliProfile {
    pub fn base_url(&self) -> Option<String> {
        normalize_text_option(self.base_url.clone())
    }

    pub fn access_token(&self) -> Option<String> {
        normalize_text_option(self.access_token.clone())
    }

    fn cleaned(self) -> Self {
        Self {
            base_url: normalize_text_option(self.base_url).map(|url| remove_trailing_slash(&url)),
            access_token: normalize_text_option(self.access_token),
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}
