//! 控制台配置
//!
//! 依次尝试 `config.toml`、`./config/config.toml`，找不到时使用默认配置，
//! 最后应用环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 控制台配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// REST 后端配置
    pub backend: BackendConfig,
    /// 控制台 HTTP 服务配置
    pub http: HttpConfig,
    /// 会话存储配置
    pub session: SessionConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// REST 后端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// 后端基础地址，所有资源路径都拼接在它后面
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// 端口
    pub port: u16,
}

/// 会话存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 令牌持久化文件
    pub store_path: PathBuf,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    /// 日志目录，为空时只输出到控制台
    pub log_dir: Option<PathBuf>,
    /// 日志文件名前缀
    pub file_prefix: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3002/api/contact".to_string(),
            timeout_seconds: 15,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("./data/session.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_prefix: "tensports-admin".to_string(),
        }
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("TENSPORTS_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Ok(port) = env::var("TENSPORTS_PORT") {
            self.http.port = port
                .parse()
                .map_err(|e| ConfigError::Validation(format!("TENSPORTS_PORT 无效: {e}")))?;
        }
        if let Ok(path) = env::var("TENSPORTS_SESSION_PATH") {
            self.session.store_path = PathBuf::from(path);
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.backend.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation("后端地址不能为空".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "后端地址必须以 http:// 或 https:// 开头: {base_url}"
            )));
        }
        if self.backend.timeout_seconds == 0 {
            return Err(ConfigError::Validation("请求超时时间必须大于0".to_string()));
        }

        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.bind_address, self.http.port)
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

/// 第一个存在的配置文件
pub fn find_config_file() -> Option<&'static str> {
    CONFIG_PATHS.into_iter().find(|p| Path::new(p).exists())
}

/// 从文件（若有）加载配置，再应用环境变量覆盖
///
/// 此时日志尚未初始化，来源由调用方在初始化日志后输出。
pub fn load_config(source: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match source {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}
