use crate::devices::{DeviceKind, DeviceName};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use radial::Theme;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DIAL_SIZE: f64 = 288.0;
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 800;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeviceConfig {
    pub kind: DeviceKind,
    pub name: Option<DeviceName>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginConfig {
    pub username: String,
    pub password: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub dial_size: f64,
    pub login: LoginConfig,
    pub login_delay_ms: u64,
    pub devices: Vec<DeviceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let living = |kind| DeviceConfig {
            kind,
            name: Some(DeviceName::new("Living")),
        };
        Self {
            theme: Theme::Dark,
            dial_size: DEFAULT_DIAL_SIZE,
            login: LoginConfig::default(),
            login_delay_ms: DEFAULT_LOGIN_DELAY_MS,
            devices: vec![
                living(DeviceKind::Aircon),
                living(DeviceKind::Tv),
                living(DeviceKind::Light),
            ],
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "hearth", "hearth").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Where the signed-in flag survives restarts.
pub fn get_session_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "hearth", "hearth").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.data_local_dir().join("session"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("HEARTH"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(|p| p.to_path_buf()) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let touched = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &config_path);

                if touched && tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_bundled_default_matches_builtin() {
        assert_eq!(parse(DEFAULT_CONFIG), Config::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse(
            r#"
            theme = "Light"
            dial_size = 320.0

            [[devices]]
            kind = "ac"
            name = "Bedroom"

            [[devices]]
            kind = "light"
            "#,
        );

        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.dial_size, 320.0);
        assert_eq!(config.login, LoginConfig::default());
        assert_eq!(config.login_delay_ms, DEFAULT_LOGIN_DELAY_MS);
        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.devices[0].kind, DeviceKind::Aircon);
        assert_eq!(config.devices[0].name, Some(DeviceName::new("Bedroom")));
        assert_eq!(config.devices[1].name, None);
    }

    #[test]
    fn test_unknown_device_kind_is_rejected() {
        let built = config::Config::builder()
            .add_source(File::from_str("[[devices]]\nkind = \"fridge\"", FileFormat::Toml))
            .build()
            .unwrap();
        assert!(built.try_deserialize::<Config>().is_err());
    }
}
