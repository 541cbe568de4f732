// ==========================================
// 库存补货分析 - 远程 feed 缓存
// ==========================================
// 策略: 按定位符缓存规范化结果，定时过期
// 红线: 失败结果不缓存；显式刷新优先于缓存
// ==========================================

use crate::catalog::error::CatalogResult;
use crate::catalog::sheet_source::SheetSource;
use crate::domain::FeedTable;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// 默认缓存有效期（秒）
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

struct CacheEntry {
    table: FeedTable,
    fetched_at: Instant,
}

pub struct FeedCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 命中且未过期则返回缓存，否则拉取并写入
    pub fn fetch_through(
        &mut self,
        source: &dyn SheetSource,
        locator: &str,
        now: Instant,
    ) -> CatalogResult<FeedTable> {
        if let Some(entry) = self.entries.get(locator) {
            if now.saturating_duration_since(entry.fetched_at) < self.ttl {
                debug!(locator, "feed 缓存命中");
                return Ok(entry.table.clone());
            }
        }

        let table = FeedTable::from_values(source.fetch_values(locator)?);
        self.entries.insert(
            locator.to_string(),
            CacheEntry {
                table: table.clone(),
                fetched_at: now,
            },
        );
        Ok(table)
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FeedCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }
}
