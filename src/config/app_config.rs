// ==========================================
// 库存补货分析 - 应用配置结构
// ==========================================
// 格式: TOML，所有段落与字段均可省略（取默认值）
// ==========================================

use crate::catalog::DEFAULT_CACHE_TTL_SECS;
use crate::domain::{columns, FeedConfig};
use crate::engine::DEFAULT_THRESHOLD_RATIO;
use crate::export::DEFAULT_SHEET_NAME;
use crate::importer::{ColumnMapping, DEFAULT_MAX_ROWS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_LOCALE: &str = "zh-CN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub columns: ColumnMapping,
    pub import: ImportSettings,
    pub reorder: ReorderSettings,
    pub catalog: CatalogSettings,
    pub sheets: SheetsSettings,
    pub export: ExportSettings,
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            import: ImportSettings::default(),
            reorder: ReorderSettings::default(),
            catalog: CatalogSettings::default(),
            sheets: SheetsSettings::default(),
            export: ExportSettings::default(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

// ===== 导入 =====
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub max_rows: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

// ===== 补货判定 =====
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderSettings {
    pub threshold_ratio: f64,
}

impl Default for ReorderSettings {
    fn default() -> Self {
        Self {
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
        }
    }
}

// ===== 外部订货清单 =====
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub cache_ttl_secs: u64,
    pub code_column: String,
    pub feeds: Vec<FeedConfig>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            code_column: columns::PRODUCT_CODE.to_string(),
            feeds: default_feeds(),
        }
    }
}

pub fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new("DF Items", "Loose Cargo!A1:C200"),
        FeedConfig::new("Shandong Items", "Shandong!A1:C200"),
        FeedConfig::new("Taiwan Glass", "Taiwan!A1:C200"),
        FeedConfig::new("Lug Cap", "Lug Cap!A1:C200"),
    ]
}

// ===== 远程表格服务 =====
// keyfile_path / access_token 二选一；access_token 优先
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsSettings {
    pub keyfile_path: Option<PathBuf>,
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub api_base: String,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            keyfile_path: None,
            spreadsheet_id: None,
            access_token: None,
            api_base: DEFAULT_SHEETS_API_BASE.to_string(),
        }
    }
}

// ===== 导出 =====
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub include_timestamp: bool,
    pub sheet_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            include_timestamp: true,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}
