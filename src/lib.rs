// ==========================================
// 库存补货分析 - 核心库
// ==========================================
// 流程: 盘点表 → 库存提取 → 补货判定 → 订货清单对账 → 导出
// 模型: 单会话、同步执行，每次只处理一个用户动作
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 盘点表解析与提取
pub mod importer;

// 引擎层 - 补货判定
pub mod engine;

// 外部订货清单 - 远程表格拉取与对账
pub mod catalog;

// 导出层 - CSV / XLSX
pub mod export;

// 配置层
pub mod config;

// 应用层 - 会话与用户动作
pub mod app;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    CatalogState, CellValue, FeedConfig, FeedTable, InventoryRecord, OrderStatus, QualityReport,
    RawTable, ReorderRecord, StatusSummary,
};

pub use importer::{extract_date_range, ImportError, InventoryExtractor, UniversalFileParser};

pub use engine::{ReorderSelector, SelectionStrategy};

pub use catalog::{reconcile, CatalogError, CatalogMerger, FeedCache, SheetSource};

pub use export::{ExportArtifact, ExportError, ExportFormat, ExportFormatter};

pub use config::{AppConfig, ConfigError, ConfigManager};

pub use app::{ActionOutcome, Notice, NoticeLevel, ReorderService, SessionState};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存补货分析";
