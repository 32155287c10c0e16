//! 服务配置
//!
//! 依次查找 `config.toml` 和 `./config/config.toml`，找不到时使用默认值，
//! 然后应用环境变量覆盖 (`FRONTEND_URL`、`DATABASE_URL`、`HOST`、`PORT`、`LOG_LEVEL`)。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 服务配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    #[validate(length(min = 1, message = "bind_address cannot be empty"))]
    pub bind_address: String,
    /// HTTP 服务端口
    #[validate(range(min = 1, message = "port must be greater than 0"))]
    pub port: u16,
    /// 唯一允许跨域访问的前端地址
    #[validate(url(message = "frontend_url must be a valid URL"))]
    pub frontend_url: String,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite 连接串，例如 `sqlite://products.db` 或 `sqlite::memory:`
    #[validate(length(min = 1, message = "database url cannot be empty"))]
    pub url: String,
    #[validate(range(min = 1, message = "max_connections must be greater than 0"))]
    pub max_connections: u32,
    pub min_connections: u32,
    #[validate(range(min = 1, message = "acquire_timeout_seconds must be greater than 0"))]
    pub acquire_timeout_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 4000,
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://products.db".to_string(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_seconds: 8,
        }
    }
}

impl DatabaseConfig {
    /// 内存数据库，只保留一个永不过期的连接
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_seconds: 5,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// 配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 应用环境变量覆盖，`lookup` 通常是 `std::env::var`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FRONTEND_URL") {
            self.http.frontend_url = url;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(host) = lookup("HOST") {
            self.http.bind_address = host;
        }
        if let Some(port) = lookup("PORT") {
            self.http.port = port
                .parse()
                .map_err(|_| ConfigError::Parse(format!("invalid PORT: {}", port)))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.http.validate()?;
        self.database.validate()?;

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Validation(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "invalid log level: {}, expected one of {:?}",
                self.logging.level, LOG_LEVELS
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("invalid config: {0}")]
    Validation(String),
}

/// 从文件或默认值加载配置，并应用环境变量覆盖
pub fn load_config() -> Result<(Config, ConfigSource), ConfigError> {
    let found = CONFIG_PATHS.iter().map(Path::new).find(|path| path.exists());

    let (mut config, source) = match found {
        Some(path) => (
            Config::load_from_file(path)?,
            ConfigSource::File(path.to_path_buf()),
        ),
        None => (Config::default(), ConfigSource::Defaults),
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;

    Ok((config, source))
}
