// ==========================================
// 库存补货分析 - 配置层
// ==========================================
// 职责: TOML 配置加载、环境变量覆写、校验
// ==========================================

pub mod app_config;
pub mod config_manager;
pub mod error;

pub use app_config::{
    default_feeds, AppConfig, CatalogSettings, ExportSettings, ImportSettings, ReorderSettings,
    SheetsSettings, DEFAULT_LOCALE, DEFAULT_SHEETS_API_BASE,
};
pub use config_manager::{apply_env_overrides, config_keys, validate, ConfigManager};
pub use error::{ConfigError, ConfigResult};
