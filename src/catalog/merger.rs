// ==========================================
// 库存补货分析 - 外部订货清单合并器
// ==========================================
// 职责: 顺序拉取各 feed → 重建产品编码并集 → 标记订货状态
// 红线: 并集每次从当前 feed 内容整体重建，绝不增量合并
// 红线: 单个 feed 失败只影响自身，不中断其余 feed
// ==========================================

use crate::catalog::feed_cache::FeedCache;
use crate::catalog::sheet_source::SheetSource;
use crate::domain::{
    columns, CatalogState, FeedConfig, FeedOutcome, FeedSnapshot, InventoryRecord, OrderStatus,
    ReorderRecord,
};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{info, instrument, warn};

pub struct CatalogMerger {
    code_column: String,
}

impl CatalogMerger {
    pub fn new(code_column: impl Into<String>) -> Self {
        Self {
            code_column: code_column.into(),
        }
    }

    pub fn code_column(&self) -> &str {
        &self.code_column
    }

    /// 按配置顺序加载所有 feed（经缓存）
    #[instrument(skip_all, fields(feeds = feeds.len()))]
    pub fn load(
        &self,
        source: &dyn SheetSource,
        cache: &mut FeedCache,
        feeds: &[FeedConfig],
        now: Instant,
    ) -> CatalogState {
        let snapshots: Vec<FeedSnapshot> = feeds
            .iter()
            .map(|feed| {
                let mut missing_code_column = false;
                let outcome = match cache.fetch_through(source, &feed.range, now) {
                    Ok(table) => {
                        if !table.headers.iter().any(|h| h == &self.code_column) {
                            warn!(
                                feed = %feed.name,
                                column = %self.code_column,
                                "feed 缺少产品编码列，不计入并集"
                            );
                            missing_code_column = true;
                        }
                        FeedOutcome::Loaded(table)
                    }
                    Err(e) => {
                        warn!(feed = %feed.name, error = %e, "feed 加载失败");
                        FeedOutcome::Failed(e.to_string())
                    }
                };
                FeedSnapshot {
                    feed: feed.clone(),
                    outcome,
                    missing_code_column,
                }
            })
            .collect();

        let union = self.rebuild_union(&snapshots);
        info!(
            loaded = snapshots.iter().filter(|s| s.table().is_some()).count(),
            codes = union.len(),
            "外部订货清单加载完成"
        );

        CatalogState {
            feeds: snapshots,
            union,
            config_error: None,
        }
    }

    /// 刷新: 清空缓存后重新拉取全部 feed
    pub fn refresh(
        &self,
        source: &dyn SheetSource,
        cache: &mut FeedCache,
        feeds: &[FeedConfig],
        now: Instant,
    ) -> CatalogState {
        cache.invalidate_all();
        self.load(source, cache, feeds, now)
    }

    /// 由当前已加载的 feed 重建并集
    pub fn rebuild_union(&self, snapshots: &[FeedSnapshot]) -> BTreeSet<String> {
        snapshots
            .iter()
            .filter_map(FeedSnapshot::table)
            .flat_map(|table| table.product_codes(&self.code_column))
            .collect()
    }
}

impl Default for CatalogMerger {
    fn default() -> Self {
        Self::new(columns::PRODUCT_CODE)
    }
}

/// 按并集成员关系标记订货状态（每次调用重新计算）
pub fn reconcile(records: &[InventoryRecord], union: &BTreeSet<String>) -> Vec<ReorderRecord> {
    records
        .iter()
        .map(|r| {
            let status = if union.contains(r.product_code.trim()) {
                OrderStatus::Ordered
            } else {
                OrderStatus::Pending
            };
            ReorderRecord::from(r.clone()).with_status(status)
        })
        .collect()
}
