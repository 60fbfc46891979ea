use serde::{Deserialize, Serialize};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RECEIPT_BASE_URL: &str = "http://localhost:5678/public";
const CONFIG_FILE: &str = "bill-portal";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// 初始票据 JSON 文件
    pub fixtures_path: Option<String>,
    /// 上传文件的访问地址前缀
    pub receipt_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            store: StoreConfig {
                fixtures_path: None,
                receipt_base_url: DEFAULT_RECEIPT_BASE_URL.to_string(),
            },
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_PORT),
            },
            store: StoreConfig {
                fixtures_path: std::env::var("BILLS_FIXTURES").ok(),
                receipt_base_url: std::env::var("RECEIPT_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_RECEIPT_BASE_URL.to_string()),
            },
        }
    }

    /// from_env (含默认值) < bill-portal.toml < BILLS__* 环境变量; 失败时回退到 from_env
    pub fn load() -> Self {
        match Self::layered(CONFIG_FILE, Self::from_env()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Layered config unavailable ({}), reading plain environment", e);
                Self::from_env()
            }
        }
    }

    fn layered(file: &str, base: Self) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", base.server.host)?
            .set_default("server.port", i64::from(base.server.port))?
            .set_default("store.receipt_base_url", base.store.receipt_base_url)?;
        if let Some(path) = base.store.fixtures_path {
            builder = builder.set_default("store.fixtures_path", path)?;
        }

        builder
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix("BILLS").separator("__"))
            .build()?
            .try_deserialize()
    }
}
