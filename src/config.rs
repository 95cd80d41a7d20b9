//! Application configuration loaded from environment variables

use ::config::{Config, Environment, Map};
use serde::Deserialize;
use thiserror::Error;

/// 設定値の読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 値を読み込めない、または型が合わない
    #[error("failed to load configuration")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// 環境変数から読み込むアプリケーション設定
///
/// | 変数 | 既定値 |
/// |---|---|
/// | `PORT` | 3000 |
/// | `DATABASE_URL` | なし（インメモリの貸出ストアを使う） |
/// | `DATABASE_MAX_CONNECTIONS` | 5 |
/// | `LOG_FILTER` | `rusty_library_loans=debug,tower_http=debug,axum=trace` |
/// | `LIBRARY_SEED_DEMO` | false |
///
/// ログフィルタは`RUST_LOG`が優先され、なければ`log_filter`を使う。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub log_filter: String,
    #[serde(rename = "library_seed_demo")]
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            database_max_connections: 5,
            log_filter: "rusty_library_loans=debug,tower_http=debug,axum=trace".to_string(),
            seed_demo_data: false,
        }
    }
}

impl AppConfig {
    /// プロセスの環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(None)
    }

    /// 環境変数の代わりに与えたマップから読み込む（`None`ならプロセスの環境変数）
    pub fn from_source(vars: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Environment::default().try_parsing(true).source(vars))
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // 空のDATABASE_URLは未設定として扱う
        app_config.database_url = app_config
            .database_url
            .filter(|url| !url.trim().is_empty());

        if app_config.database_max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        Ok(app_config)
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
