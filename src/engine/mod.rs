// ==========================================
// 库存补货分析 - 引擎层
// ==========================================
// 职责: 补货判定规则与选择策略
// 红线: 纯函数，不持有会话状态
// ==========================================

pub mod reorder_selector;
pub mod strategy;

// 重导出核心引擎
pub use reorder_selector::ReorderSelector;
pub use strategy::{SelectionStrategy, DEFAULT_THRESHOLD_RATIO};
