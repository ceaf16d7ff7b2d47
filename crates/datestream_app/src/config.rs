use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use datestream_client::{ClientSettings, SubmitSettings};
use datestream_logging::ds_info;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cli::Cli;
use crate::logging::{LogDestination, LogLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub socket_path: String,
    pub connect_timeout_ms: u64,
    pub log_destination: LogDestination,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:3000".to_string(),
            socket_path: "/frontend".to_string(),
            connect_timeout_ms: 10_000,
            log_destination: LogDestination::Terminal,
            log_level: LogLevel::Info,
        }
    }
}

impl AppConfig {
    /// Reads the config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };
        ron::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(server) = &cli.server {
            self.server_url = server.to_string();
        }
        if cli.verbose && self.log_level.filter() < LevelFilter::Debug {
            self.log_level = LogLevel::Debug;
        }
    }

    pub fn client_settings(&self) -> Result<ClientSettings> {
        let base_url = Url::parse(&self.server_url)
            .with_context(|| format!("invalid server_url {:?}", self.server_url))?;
        ds_info!("server {} socket path {}", base_url, self.socket_path);
        Ok(ClientSettings {
            submit: SubmitSettings {
                base_url,
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: None,
            },
            socket_path: self.socket_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("datestream.ron");
        fs::write(
            &path,
            r#"(server_url: "https://dates.example", log_destination: Both)"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server_url, "https://dates.example");
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.socket_path, "/frontend");
        assert_eq!(config.connect_timeout_ms, 10_000);
    }

    #[test]
    fn invalid_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(server_url: 42").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.ron"));
    }

    #[test]
    fn cli_overrides_server_and_level() {
        let cli = Cli::parse_from([
            "datestream",
            "--server",
            "http://10.0.0.2:4000",
            "--verbose",
            "extract",
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(&cli);
        assert_eq!(config.server_url, "http://10.0.0.2:4000/");
        assert_eq!(config.log_level, LogLevel::Debug);

        let settings = config.client_settings().unwrap();
        assert_eq!(
            settings.socket_url().unwrap().as_str(),
            "ws://10.0.0.2:4000/frontend"
        );
    }

    #[test]
    fn verbose_keeps_a_more_detailed_level() {
        let cli = Cli::parse_from(["datestream", "-v", "extract"]);
        let mut config = AppConfig {
            log_level: LogLevel::Trace,
            ..AppConfig::default()
        };
        config.apply_overrides(&cli);
        assert_eq!(config.log_level, LogLevel::Trace);
    }

    #[test]
    fn bad_server_url_is_a_startup_error() {
        let config = AppConfig {
            server_url: "nowhere".to_string(),
            ..AppConfig::default()
        };
        assert!(config.client_settings().is_err());
    }
}
