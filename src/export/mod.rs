// ==========================================
// 库存补货分析 - 导出层
// ==========================================
// 职责: 记录集合 → 导出表 → CSV/XLSX 字节流
// 依赖: csv + rust_xlsxwriter
// ==========================================

pub mod error;
pub mod formatter;
pub mod table;

pub use error::{ExportError, ExportResult};
pub use formatter::{
    to_csv_bytes, to_xlsx_bytes, ExportArtifact, ExportFormat, ExportFormatter, DEFAULT_SHEET_NAME,
};
pub use table::{ExportCell, ExportTable, TIMESTAMP_FORMAT};
