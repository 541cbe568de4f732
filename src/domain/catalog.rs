// ==========================================
// 库存补货分析 - 外部订货清单模型
// ==========================================
// 用途: 远程表格各 feed 的规范化结果 + 产品编码并集
// 生命周期: 按需拉取，刷新时整体重建
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// FeedConfig - feed 定义
// ==========================================
// name: 展示名（如 "DF Items"）
// range: 远程定位符（工作表名 + 单元格区域，如 "Loose Cargo!A1:C200"）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub range: String,
}

impl FeedConfig {
    pub fn new(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
        }
    }
}

// ==========================================
// FeedTable - 规范化后的 feed 数据
// ==========================================
// 红线: 每行长度 == 表头长度；不含全空行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl FeedTable {
    /// 由远程返回的二维数组构建（首行为表头）
    ///
    /// - 短行右侧补空串，长行截断到表头宽度
    /// - 丢弃全空行
    pub fn from_values(values: Vec<Vec<String>>) -> Self {
        let mut iter = values.into_iter();
        let headers: Vec<String> = match iter.next() {
            Some(h) => h.into_iter().map(|c| c.trim().to_string()).collect(),
            None => return Self::default(),
        };
        let width = headers.len();

        let rows = iter
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
            .collect();

        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 指定列的非空产品编码（TRIM 后）
    pub fn product_codes(&self, code_column: &str) -> Vec<String> {
        let Some(idx) = self.headers.iter().position(|h| h == code_column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(idx))
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// ==========================================
// FeedOutcome / FeedSnapshot - 单个 feed 的加载结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedOutcome {
    Loaded(FeedTable),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub feed: FeedConfig,
    pub outcome: FeedOutcome,
    // 已加载但缺少产品编码列，不贡献任何编码
    #[serde(default)]
    pub missing_code_column: bool,
}

impl FeedSnapshot {
    pub fn table(&self) -> Option<&FeedTable> {
        match &self.outcome {
            FeedOutcome::Loaded(t) => Some(t),
            FeedOutcome::Failed(_) => None,
        }
    }
}

// ==========================================
// CatalogState - 外部订货清单会话状态
// ==========================================
// union: 所有已加载 feed 的产品编码并集（仅用于成员判断）
// config_error: 配置缺失时记录一次，不再自动重试
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogState {
    pub feeds: Vec<FeedSnapshot>,
    pub union: BTreeSet<String>,
    pub config_error: Option<String>,
}

impl CatalogState {
    pub fn feed(&self, name: &str) -> Option<&FeedSnapshot> {
        self.feeds.iter().find(|f| f.feed.name == name)
    }

    pub fn is_loaded(&self) -> bool {
        !self.feeds.is_empty()
    }

    pub fn contains(&self, product_code: &str) -> bool {
        self.union.contains(product_code)
    }
}
