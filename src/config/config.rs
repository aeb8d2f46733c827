use home_dir::HomeDirExt;
use std::{io::Write, path::PathBuf, time::Duration};

use anyhow::{anyhow, Result};
use url::Url;

use crate::endpoint::parse_endpoint;

use super::app_config::AppConfig;

pub struct Config {
    config_file: PathBuf,
    app_config: AppConfig,
}

impl Config {
    pub fn new_from_file(config_path: Option<String>) -> Result<Config> {
        if let Some(config_path) = config_path {
            let config_path = expand_home(PathBuf::from(config_path))?;

            Config::new(config_path)
        } else {
            Config::new_default()
        }
    }

    pub fn new_default() -> Result<Config> {
        let config_directory_root =
            std::env::var("XDG_CONFIG_HOME").unwrap_or("~/.config".to_string());

        let config_directory = expand_home(PathBuf::from(config_directory_root))?.join("bookerics");
        let config_file = config_directory.join("config.toml");

        Config::new(config_file)
    }

    fn new(config_file: PathBuf) -> Result<Config> {
        if let Some(parent) = config_file.parent() {
            ensure_dir(&parent.to_path_buf())?;
        }

        let app_config: AppConfig = {
            let file_content = ensure_file(
                &config_file,
                toml::to_string_pretty(&AppConfig::new_default())?,
            )?;

            toml::from_str(&file_content)?
        };

        let config = Config {
            config_file,
            app_config,
        };

        config.validate().and(Ok(config))
    }

    /// Endpoints given on the command line replace the configured list.
    pub fn override_endpoints(&mut self, endpoints: Vec<String>) -> Result<()> {
        if endpoints.is_empty() {
            return Ok(());
        }

        self.app_config.endpoints = endpoints;

        self.validate()
    }

    pub fn get_endpoints(&self) -> Result<Vec<Url>> {
        self.app_config
            .endpoints
            .iter()
            .map(|endpoint| parse_endpoint(endpoint))
            .collect()
    }

    pub fn get_ack_timeout(&self) -> Duration {
        Duration::from_millis(self.app_config.ack_timeout_ms)
    }

    pub fn get_request_timeout(&self) -> Duration {
        Duration::from_millis(self.app_config.request_timeout_ms)
    }

    /// `None` when popups are disabled.
    pub fn get_popup_command(&self) -> Option<String> {
        if !self.app_config.use_popup {
            return None;
        }

        let default = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        };

        Some(
            self.app_config
                .popup_command
                .clone()
                .unwrap_or(default.to_string()),
        )
    }

    pub fn get_log_level(&self) -> &str {
        &self.app_config.log_level
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_config.endpoints.len() == 0 {
            return Err(anyhow!(
                "Given endpoints list is empty (config file path: \"{}\")",
                self.config_file.display()
            ));
        }

        if let Err(error) = self.get_endpoints() {
            return Err(anyhow!(
                "{} (config file path: \"{}\")",
                error,
                self.config_file.display()
            ));
        }

        if self.app_config.ack_timeout_ms == 0 {
            return Err(anyhow!(
                "Given ack_timeout_ms must be greater than zero (config file path: \"{}\")",
                self.config_file.display()
            ));
        }

        if self.app_config.request_timeout_ms == 0 {
            return Err(anyhow!(
                "Given request_timeout_ms must be greater than zero (config file path: \"{}\")",
                self.config_file.display()
            ));
        }

        Ok(())
    }
}

fn expand_home(path: PathBuf) -> Result<PathBuf> {
    path.expand_home()
        .map_err(|_| anyhow!("Cannot expand home directory in \"{}\"", path.display()))
}

fn ensure_dir(dir: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    Ok(())
}

fn ensure_file(file_path: &PathBuf, default: String) -> Result<String> {
    if !file_path.exists() {
        let mut file = std::fs::File::create(file_path)?;
        file.write_all(&default.as_bytes())?;
        Ok(default)
    } else {
        Ok(std::fs::read_to_string(file_path)?)
    }
}
