// ==========================================
// 库存补货分析 - 外部订货清单层
// ==========================================
// 职责: 远程表格拉取、缓存、并集重建、订货状态对账
// 依赖: reqwest (blocking) + jsonwebtoken
// ==========================================

pub mod error;
pub mod feed_cache;
pub mod google_sheets;
pub mod merger;
pub mod sheet_source;

pub use error::{CatalogError, CatalogResult};
pub use feed_cache::{FeedCache, DEFAULT_CACHE_TTL_SECS};
pub use google_sheets::{GoogleSheetsClient, ServiceAccountKey, ServiceAccountTokenProvider};
pub use merger::{reconcile, CatalogMerger};
pub use sheet_source::{SheetSource, StaticToken, TokenProvider};
