// ==========================================
// 库存补货分析 - 应用层
// ==========================================
// 职责: 会话状态 + 用户动作编排（上传、订货清单、导出）
// ==========================================

pub mod notice;
pub mod service;
pub mod session;

pub use notice::{ActionOutcome, Notice, NoticeLevel};
pub use service::ReorderService;
pub use session::{InventorySnapshot, SessionState};
