use std::path::{Path, PathBuf};

use anyhow::Result;
use derive_builder::Builder;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{0}` is not an http(s) URL")]
    InvalidHomeserver(String),
    #[error("access token is empty")]
    EmptyAccessToken,
    #[error("environment variable `{0}` is not set")]
    MissingVar(&'static str),
    #[error("environment variable `{0}` is not a number")]
    InvalidNumber(&'static str),
}

/// Homeserver credentials shared with the sticker picker tooling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub homeserver: String,
    pub access_token: String,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.homeserver.starts_with("http://") && !self.homeserver.starts_with("https://") {
            return Err(ConfigError::InvalidHomeserver(self.homeserver.clone()));
        }
        if self.access_token.trim().is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(())
    }

    fn prompt_blocking() -> Result<Config> {
        let theme = ColorfulTheme::default();
        let homeserver: String = Input::with_theme(&theme)
            .with_prompt("Homeserver URL")
            .validate_with(|input: &String| -> Result<(), &'static str> {
                if input.starts_with("http://") || input.starts_with("https://") {
                    Ok(())
                } else {
                    Err("must start with http:// or https://")
                }
            })
            .interact_text()?;
        let access_token: String = Input::with_theme(&theme)
            .with_prompt("Access token")
            .interact_text()?;
        let config = Config {
            homeserver: homeserver.trim_end_matches('/').to_string(),
            access_token: access_token.trim().to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads the config at `path`, asking for the values and writing the file if it doesn't exist yet.
    pub async fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if crate::fs::exists(path).await? {
            let json = tokio::fs::read_to_string(path).await?;
            let config = Config::from_json(&json)?;
            info!("loaded config from `{}`", path.display());
            return Ok(config);
        }

        info!("config `{}` not found, creating it", path.display());
        let config = tokio::task::spawn_blocking(Config::prompt_blocking).await??;
        tokio::fs::write(path, serde_json::to_string_pretty(&config)?).await?;
        Ok(config)
    }
}

/// Everything needed to open a Telegram session
#[derive(Debug, Clone, Builder)]
pub struct TelegramConfig {
    pub api_id: i32,
    pub api_hash: String,
    pub session_file: PathBuf,
}

impl TelegramConfig {
    pub fn builder() -> TelegramConfigBuilder {
        TelegramConfigBuilder::default()
    }

    /// Reads `TG_API_ID` and `TG_API_HASH`, honouring a `.env` file.
    pub fn from_env(session: &str) -> Result<TelegramConfig> {
        let api_id = dotenv::var("TG_API_ID").map_err(|_| ConfigError::MissingVar("TG_API_ID"))?;
        let api_id = api_id
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber("TG_API_ID"))?;
        let api_hash =
            dotenv::var("TG_API_HASH").map_err(|_| ConfigError::MissingVar("TG_API_HASH"))?;

        Ok(Self::builder()
            .api_id(api_id)
            .api_hash(api_hash)
            .session_file(session_file(session))
            .build()?)
    }
}

/// `<session>.session`, unless the name already carries the extension
pub fn session_file(session: &str) -> PathBuf {
    let path = PathBuf::from(session);
    if path.extension().map_or(false, |ext| ext == "session") {
        path
    } else {
        PathBuf::from(format!("{session}.session"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_config() {
        let config =
            Config::from_json(r#"{"homeserver": "https://matrix.org", "access_token": "abc"}"#)
                .unwrap();
        assert_eq!(config.homeserver, "https://matrix.org");
        assert_eq!(config.access_token, "abc");
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(matches!(
            Config::from_json(r#"{"homeserver": "matrix.org", "access_token": "abc"}"#),
            Err(ConfigError::InvalidHomeserver(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"homeserver": "https://matrix.org", "access_token": " "}"#),
            Err(ConfigError::EmptyAccessToken)
        ));
        assert!(matches!(
            Config::from_json(r#"{"homeserver": "https://matrix.org"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn loads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"homeserver": "http://localhost:8008", "access_token": "t"}"#,
        )
        .unwrap();
        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.homeserver, "http://localhost:8008");
    }

    #[test]
    fn session_file_names() {
        assert_eq!(session_file("sticker-import"), PathBuf::from("sticker-import.session"));
        assert_eq!(session_file("a.session"), PathBuf::from("a.session"));
    }

    #[test]
    fn builder_requires_all_fields() {
        assert!(TelegramConfig::builder().api_id(1).build().is_err());
        let config = TelegramConfig::builder()
            .api_id(1)
            .api_hash("hash".to_string())
            .session_file(session_file("x"))
            .build()
            .unwrap();
        assert_eq!(config.session_file, PathBuf::from("x.session"));
    }
}
