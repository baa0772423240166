use crate::cli::{AccessArgs, ApiVersion, Cli};
use crate::domain::constants::{CONFIG_FILE, DEFAULT_BRIDGE};
use crate::domain::models::{DeploySettings, DeploymentConfig, SettingsFile};
use log::debug;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))
}

/// Loads the config file. An explicitly named file must exist; the default
/// location is optional.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<SettingsFile> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let Some(p) = default_config_path() else {
                debug!("HOME is not set; using default settings");
                return Ok(SettingsFile::default());
            };
            if !p.exists() {
                return Ok(SettingsFile::default());
            }
            p
        }
    };
    debug!("loading settings from {}", path.display());
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
    Ok(toml::from_str(&raw)?)
}

pub fn bridge_program(cli: &Cli, settings: &SettingsFile) -> String {
    cli.bridge
        .clone()
        .or_else(|| settings.library.bridge.clone())
        .unwrap_or_else(|| DEFAULT_BRIDGE.to_string())
}

pub fn api_version(cli: &Cli, settings: &SettingsFile) -> ApiVersion {
    cli.api_version
        .or(settings.library.api_version)
        .unwrap_or_default()
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(rest),
            Err(_) => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Credentials from the command line take precedence over the config file.
pub fn deployment_config(
    address: Ipv4Addr,
    access: &AccessArgs,
    deploy: &DeploySettings,
) -> DeploymentConfig {
    DeploymentConfig {
        address,
        password: access.password.clone().or_else(|| deploy.password.clone()),
        identity_file: access
            .identity_file
            .as_deref()
            .or(deploy.identity_file.as_deref())
            .map(expand_home),
        passphrase: access
            .passphrase
            .clone()
            .or_else(|| deploy.passphrase.clone()),
    }
}

pub fn reboot_flag(access: &AccessArgs, deploy: &DeploySettings) -> bool {
    deploy.reboot && !access.no_reboot
}
