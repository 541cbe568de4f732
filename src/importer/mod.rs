// ==========================================
// 库存补货分析 - 导入层
// ==========================================
// 职责: 上传盘点表 → 规范库存记录；报表期间提取
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod date_range;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod inventory_extractor;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use date_range::{extract_date_range, find_dates};
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{ColumnMapping, FieldMapper as FieldMapperImpl};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use inventory_extractor::{Extraction, InventoryExtractor, DEFAULT_MAX_ROWS};

// 重导出 Trait 接口
pub use importer_trait::{DataCleaner, DqValidator, FieldMapper, FileParser};
