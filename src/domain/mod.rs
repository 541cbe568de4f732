// ==========================================
// 库存补货分析 - 领域模型层
// ==========================================
// 职责: 定义原始表格、库存记录、外部订货清单等实体
// 红线: 不含 I/O，不含业务规则
// ==========================================

pub mod catalog;
pub mod inventory;
pub mod raw_table;

// 重导出核心类型
pub use catalog::{CatalogState, FeedConfig, FeedOutcome, FeedSnapshot, FeedTable};
pub use inventory::{
    columns, InventoryRecord, OrderStatus, QualityReport, ReorderRecord, StatusSummary,
};
pub use raw_table::{CellValue, RawTable};
