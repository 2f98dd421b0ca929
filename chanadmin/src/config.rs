use std::{path::PathBuf, time::Duration};

use clap::Parser;

pub const DEFAULT_BOT_TOKEN_ENV: &str = "BOT_TOKEN";
pub const DEFAULT_ADMIN_ID_ENV: &str = "ADMIN_USER_ID";
pub const DEFAULT_DISPATCH_INTERVAL_SECONDS: u64 = 30;

/// A Telegram bot for administering channels: posts, schedules, broadcasts and settings
#[derive(Parser, Debug)]
#[command(name = "chanadmin")]
#[command(about = "A Telegram bot for administering channels", long_about = None)]
pub struct Args {
    /// Environment variable name containing the bot token
    #[arg(long, default_value = DEFAULT_BOT_TOKEN_ENV)]
    pub bot_token_env: String,

    /// Environment variable name containing the administrator's numeric user id
    #[arg(long, default_value = DEFAULT_ADMIN_ID_ENV)]
    pub admin_id_env: String,

    /// Directory holding users.json, channels.json, scheduled_posts.json and settings.json
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Seconds between checks for due scheduled posts
    #[arg(long, default_value_t = DEFAULT_DISPATCH_INTERVAL_SECONDS)]
    pub dispatch_interval: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No bot token provided. Please set the {0} environment variable.")]
    MissingToken(String),
}

/// Immutable runtime configuration, built once at startup and shared by reference
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub admin_id: Option<u64>,
    pub data_dir: PathBuf,
    pub dispatch_interval: Duration,
}

impl Args {
    /// Read the environment once and build the configuration
    pub fn into_config(self) -> Result<Config, ConfigError> {
        self.into_config_with(|name| std::env::var(name).ok())
    }

    fn into_config_with(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Config, ConfigError> {
        let bot_token = lookup(&self.bot_token_env)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ConfigError::MissingToken(self.bot_token_env.clone()))?;

        let admin_id = parse_admin_id(lookup(&self.admin_id_env).as_deref());
        if admin_id.is_none() {
            log::warn!(
                "No {} provided. Please set the {} environment variable for full functionality.",
                self.admin_id_env,
                self.admin_id_env
            );
        }

        Ok(Config {
            bot_token,
            admin_id,
            data_dir: self.data_dir,
            dispatch_interval: Duration::from_secs(self.dispatch_interval.max(1)),
        })
    }
}

/// `0`, empty and non-numeric values mean "no administrator"
fn parse_admin_id(value: Option<&str>) -> Option<u64> {
    match value?.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(id),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn args() -> Args {
        Args::parse_from(["chanadmin"])
    }

    #[test]
    fn test_defaults() {
        let args = args();
        assert_eq!(args.bot_token_env, "BOT_TOKEN");
        assert_eq!(args.admin_id_env, "ADMIN_USER_ID");
        assert_eq!(args.data_dir, PathBuf::from("data"));
        assert_eq!(args.dispatch_interval, 30);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let result = args().into_config_with(|_| None);
        assert!(matches!(result, Err(ConfigError::MissingToken(name)) if name == "BOT_TOKEN"));

        let result = args().into_config_with(|_| Some("  ".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_admin_id_is_optional() {
        let env = HashMap::from([("BOT_TOKEN", "123:abc")]);
        let config = args()
            .into_config_with(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.admin_id, None);
    }

    #[test]
    fn test_admin_id_parsing() {
        assert_eq!(parse_admin_id(Some("42")), Some(42));
        assert_eq!(parse_admin_id(Some(" 42 ")), Some(42));
        assert_eq!(parse_admin_id(Some("0")), None);
        assert_eq!(parse_admin_id(Some("admin")), None);
        assert_eq!(parse_admin_id(None), None);
    }

    #[test]
    fn test_custom_env_names() {
        let args = Args::parse_from([
            "chanadmin",
            "--bot-token-env",
            "MY_TOKEN",
            "--admin-id-env",
            "MY_ADMIN",
            "--data-dir",
            "/tmp/chanadmin",
        ]);
        let env = HashMap::from([("MY_TOKEN", "t"), ("MY_ADMIN", "7")]);
        let config = args
            .into_config_with(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.admin_id, Some(7));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/chanadmin"));
    }
}
