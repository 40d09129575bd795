//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::application::messaging::dispatcher::DEFAULT_FALLBACK_REPLY;
use crate::infrastructure::llm::LLMConfig;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub llm: LLMConfig,
    pub database: DatabaseConfig,
    pub services: ServicesConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    pub fallback_reply: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "wechatgpt".to_string(),
            prefix: "/".to_string(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DatabaseConfig {
    /// When false, exchanges live only in process memory
    pub enabled: bool,
    /// `:memory:` gives a throwaway SQLite database
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("wechatgpt.db"),
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }
}

/// External HTTP services used by commands
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServicesConfig {
    pub amap_key: Option<String>,
    pub default_location: String,
    pub emoji_api: String,
    pub scratch_dir: PathBuf,
    pub timeout_seconds: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            amap_key: None,
            default_location: "Beijing".to_string(),
            emoji_api: "http://www.plapi.tech/api/emoji.php?type=json".to_string(),
            scratch_dir: std::env::temp_dir(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AdaptersConfig {
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Locality reported for the console user
    pub region: Option<String>,
    pub city: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            region: None,
            city: None,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Environment variables win over file values
    pub fn apply_env(&mut self) {
        self.llm.apply_env();

        if let Ok(key) = std::env::var("AMAP_KEY") {
            self.services.amap_key = Some(key);
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.llm.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingField("llm.api-key".to_string())),
        }
        if self.bot.prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue("bot.prefix must not be empty".to_string()));
        }
        if self.llm.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidValue(
                "llm.max-concurrent-requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn console(&self) -> ConsoleConfig {
        self.adapters.console.clone().unwrap_or_default()
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
bot:
  prefix: "!"
llm:
  api-key: sk-test
  max-concurrent-requests: 2
services:
  default-location: Shanghai
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.bot.name, "wechatgpt");
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.max_concurrent_requests, 2);
        assert_eq!(config.llm.timeout_seconds, 60);
        assert_eq!(config.services.default_location, "Shanghai");
        assert_eq!(config.services.timeout_seconds, 15);
        assert_eq!(config.database.path, PathBuf::from("wechatgpt.db"));
        assert!(config.console().enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField(ref f)) if f == "llm.api-key"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-test".to_string());
        config.bot.prefix = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_generated_yaml_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, Config::default().to_yaml().unwrap()).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.bot.name, "wechatgpt");
        assert_eq!(loaded.services.emoji_api, ServicesConfig::default().emoji_api);
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        assert!(matches!(
            Config::load("/nonexistent/wechatgpt.yaml"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_in_memory_database() {
        let db = DatabaseConfig {
            enabled: true,
            path: PathBuf::from(":memory:"),
        };
        assert!(db.in_memory());
        assert!(!DatabaseConfig::default().in_memory());
    }
}
