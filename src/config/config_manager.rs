// ==========================================
// 库存补货分析 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、校验
// 存储: TOML 文件（默认 <config_dir>/inventory-reorder/config.toml）
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::config::app_config::AppConfig;
use crate::config::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 环境变量
    pub const ENV_KEYFILE: &str = "INVENTORY_REORDER_KEYFILE";
    pub const ENV_SPREADSHEET_ID: &str = "INVENTORY_REORDER_SPREADSHEET_ID";
    pub const ENV_ACCESS_TOKEN: &str = "INVENTORY_REORDER_ACCESS_TOKEN";

    // 校验用配置键
    pub const MAX_ROWS: &str = "import.max_rows";
    pub const THRESHOLD_RATIO: &str = "reorder.threshold_ratio";
    pub const CACHE_TTL_SECS: &str = "catalog.cache_ttl_secs";
    pub const CODE_COLUMN: &str = "catalog.code_column";
    pub const FEEDS: &str = "catalog.feeds";
    pub const SHEET_NAME: &str = "export.sheet_name";
    pub const COLUMNS: &str = "columns";

    // 目录与文件名
    pub const APP_DIR: &str = "inventory-reorder";
    pub const CONFIG_FILE: &str = "config.toml";
}

// Excel 工作表名长度上限
const MAX_SHEET_NAME_LEN: usize = 31;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: AppConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 加载配置
    ///
    /// # 参数
    /// - path: 显式配置路径；None 时使用默认路径
    ///
    /// # 返回
    /// - 文件不存在: 默认配置
    /// - 文件存在但无效: Err
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// 加载配置（环境变量查询可注入）
    pub fn load_with_env<F>(path: Option<&Path>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);

        let (mut config, source) = match path {
            Some(p) if p.exists() => (Self::read_file(&p)?, Some(p)),
            Some(p) => {
                debug!(path = %p.display(), "配置文件不存在，使用默认配置");
                (AppConfig::default(), None)
            }
            None => (AppConfig::default(), None),
        };

        apply_env_overrides(&mut config, env);
        validate(&config)?;

        info!(
            source = source.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "default".to_string()),
            feeds = config.catalog.feeds.len(),
            "配置加载完成"
        );
        Ok(Self { config, source })
    }

    /// 由已构建的配置创建（校验后）
    pub fn from_config(config: AppConfig) -> ConfigResult<Self> {
        validate(&config)?;
        Ok(Self {
            config,
            source: None,
        })
    }

    /// 默认配置路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(config_keys::APP_DIR).join(config_keys::CONFIG_FILE))
    }

    fn read_file(path: &Path) -> ConfigResult<AppConfig> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 环境变量覆写远程表格凭据
pub fn apply_env_overrides<F>(config: &mut AppConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(keyfile) = non_blank(env(config_keys::ENV_KEYFILE)) {
        config.sheets.keyfile_path = Some(PathBuf::from(keyfile));
    }
    if let Some(id) = non_blank(env(config_keys::ENV_SPREADSHEET_ID)) {
        config.sheets.spreadsheet_id = Some(id);
    }
    if let Some(token) = non_blank(env(config_keys::ENV_ACCESS_TOKEN)) {
        config.sheets.access_token = Some(token);
    }
}

/// 校验配置
pub fn validate(config: &AppConfig) -> ConfigResult<()> {
    if config.import.max_rows == 0 {
        return Err(ConfigError::invalid(config_keys::MAX_ROWS, "必须大于 0"));
    }

    let ratio = config.reorder.threshold_ratio;
    if !ratio.is_finite() || ratio < 0.0 {
        return Err(ConfigError::invalid(
            config_keys::THRESHOLD_RATIO,
            format!("必须为非负有限数，当前值 {}", ratio),
        ));
    }

    if config.catalog.cache_ttl_secs == 0 {
        return Err(ConfigError::invalid(config_keys::CACHE_TTL_SECS, "必须大于 0"));
    }
    if config.catalog.code_column.trim().is_empty() {
        return Err(ConfigError::invalid(config_keys::CODE_COLUMN, "不能为空"));
    }
    for feed in &config.catalog.feeds {
        if feed.name.trim().is_empty() || feed.range.trim().is_empty() {
            return Err(ConfigError::invalid(
                config_keys::FEEDS,
                "feed 名称与区域均不能为空",
            ));
        }
    }

    let labels = config.columns.labels();
    if labels.iter().any(|l| l.trim().is_empty()) {
        return Err(ConfigError::invalid(config_keys::COLUMNS, "源列标签不能为空"));
    }

    let sheet_name = config.export.sheet_name.trim();
    if sheet_name.is_empty() || sheet_name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(ConfigError::invalid(
            config_keys::SHEET_NAME,
            format!("长度须在 1..={} 之间", MAX_SHEET_NAME_LEN),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let manager = ConfigManager::load_with_env(Some(path.as_path()), no_env).unwrap();
        assert_eq!(manager.config(), &AppConfig::default());
        assert!(manager.source().is_none());
        assert_eq!(manager.config().catalog.feeds.len(), 4);
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[reorder]\nthreshold_ratio = 1.5\n\n[sheets]\nspreadsheet_id = \"from-file\""
        )
        .unwrap();

        let manager = ConfigManager::load_with_env(Some(file.path()), no_env).unwrap();
        let config = manager.config();
        assert_eq!(config.reorder.threshold_ratio, 1.5);
        assert_eq!(config.import.max_rows, 30_000);
        assert_eq!(config.columns.unit_sold, "Unnamed: 40");
        assert_eq!(config.sheets.spreadsheet_id.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sheets]\nspreadsheet_id = \"from-file\"").unwrap();

        let env: HashMap<&str, &str> = [
            (config_keys::ENV_SPREADSHEET_ID, "from-env"),
            (config_keys::ENV_KEYFILE, "/tmp/key.json"),
        ]
        .into_iter()
        .collect();
        let manager =
            ConfigManager::load_with_env(Some(file.path()), |k| env.get(k).map(|v| v.to_string()))
                .unwrap();

        let sheets = &manager.config().sheets;
        assert_eq!(sheets.spreadsheet_id.as_deref(), Some("from-env"));
        assert_eq!(sheets.keyfile_path, Some(PathBuf::from("/tmp/key.json")));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reorder\nthreshold_ratio = ").unwrap();
        assert!(matches!(
            ConfigManager::load_with_env(Some(file.path()), no_env),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_negative_ratio_rejected() {
        let mut config = AppConfig::default();
        config.reorder.threshold_ratio = -0.5;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Invalid { ref key, .. }) if key == config_keys::THRESHOLD_RATIO
        ));
    }

    #[test]
    fn test_sheet_name_length_checked() {
        let mut config = AppConfig::default();
        config.export.sheet_name = "x".repeat(32);
        assert!(validate(&config).is_err());
    }
}
