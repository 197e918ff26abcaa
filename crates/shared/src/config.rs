//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::path::Path;

use crate::observability::ObservabilityConfig;

/// 规则目录配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 元数据接口返回的规则目录 JSON 文件路径
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "config/rule-catalog.json".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub catalog: CatalogConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置，配置目录取自 CONFIG_DIR，默认 ./config
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
        Self::load_from(&config_dir, service_name)
    }

    /// 从指定目录加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. {config_dir}/default.toml（默认配置）
    /// 2. {config_dir}/{environment}.toml（环境特定配置）
    /// 3. {config_dir}/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（PROMO_ 前缀，双下划线分隔层级，如 PROMO_CATALOG__PATH -> catalog.path）
    pub fn load_from(config_dir: &str, service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("PROMO_ENV").unwrap_or_else(|_| "development".to_string());
        Self::build(Path::new(config_dir), service_name, &env, None)
    }

    /// 按固定层级构建配置；`env_vars` 为 None 时读取进程环境变量
    fn build(
        dir: &Path,
        service_name: &str,
        env: &str,
        env_vars: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(dir.join("default.toml")).required(false))
            .add_source(File::from(dir.join(format!("{}.toml", env))).required(false))
            .add_source(File::from(dir.join(format!("{}.toml", service_name))).required(false))
            .add_source(
                Environment::with_prefix("PROMO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env_vars),
            );

        builder.build()?.try_deserialize()
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
