use optsync_core::config::normalize_base_url;
use optsync_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::commands::common::{ConnectionOverrides, ACCESS_TOKEN_ENV};
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            base_url,
            access_token,
            timeout,
            no_activate,
        } => {
            let mut config = CliProfilesConfig::load()?;
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            init_profile(
                &mut config,
                &profile_name,
                ConnectionOverrides {
                    base_url,
                    access_token,
                    timeout_secs: timeout,
                },
                ConnectionOverrides::from_env(),
                no_activate,
            )?;

            let path = config.save()?;
            println!(
                "Profile '{}' initialized at {}",
                profile_name,
                path.display()
            );
            if config
                .profile(&profile_name)
                .and_then(|profile| profile.access_token())
                .is_none()
            {
                println!(
                    "Profile '{profile_name}' has no access token; pass --access-token or set {ACCESS_TOKEN_ENV}."
                );
            }
            Ok(())
        }
    }
}

/// Merge explicit values, then environment, over an existing profile.
pub fn init_profile(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    explicit: ConnectionOverrides,
    environment: ConnectionOverrides,
    no_activate: bool,
) -> Result<(), CliError> {
    let profile = config.profile_mut_or_default(profile_name);

    let base_url = normalize_text_option(explicit.base_url)
        .or_else(|| normalize_text_option(environment.base_url))
        .or_else(|| profile.base_url())
        .ok_or_else(|| CliError::Config("base_url is required".to_string()))?;
    profile.base_url = Some(
        normalize_base_url(&base_url).map_err(|error| CliError::Config(error.to_string()))?,
    );

    if let Some(token) = normalize_text_option(explicit.access_token)
        .or_else(|| normalize_text_option(environment.access_token))
    {
        profile.access_token = Some(token);
    }
    if let Some(timeout) = explicit.timeout_secs {
        if timeout == 0 {
            return Err(CliError::Config(
                "timeout must be at least one second".to_string(),
            ));
        }
        profile.request_timeout_secs = Some(timeout);
    }

    if !no_activate {
        config.active_profile = Some(profile_name.to_string());
    }
    Ok(())
}
