// ==========================================
// 库存补货分析 - 选择策略定义
// ==========================================
// 用途：
// - 同一份规范库存记录上的不同筛选口径（补货 / 畅销 TopN / 滞销）；
// - 导出文件名前缀随策略变化，便于区分下载结果。

use serde::{Deserialize, Serialize};

/// 默认补货阈值比例（销量 >= 结存 * 比例）
pub const DEFAULT_THRESHOLD_RATIO: f64 = 1.0;

/// 选择策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SelectionStrategy {
    /// 需补货：unit_sold >= balance_stock * ratio
    NeedsReorder { ratio: f64 },
    /// 畅销 TopN：按销量降序取前 N（同销量保持原行序）
    TopSold { limit: usize },
    /// 滞销：销量为 0
    DeadStock,
    /// 全部记录
    All,
}

impl SelectionStrategy {
    pub const TOP_50: SelectionStrategy = SelectionStrategy::TopSold { limit: 50 };
    pub const TOP_200: SelectionStrategy = SelectionStrategy::TopSold { limit: 200 };

    pub fn needs_reorder() -> Self {
        SelectionStrategy::NeedsReorder {
            ratio: DEFAULT_THRESHOLD_RATIO,
        }
    }

    /// 导出文件名前缀
    pub fn export_stem(&self) -> String {
        match self {
            SelectionStrategy::NeedsReorder { .. } => "reorder_list".to_string(),
            SelectionStrategy::TopSold { limit } => format!("top{}", limit),
            SelectionStrategy::DeadStock => "dead_stock".to_string(),
            SelectionStrategy::All => "all_products".to_string(),
        }
    }

    pub fn title_cn(&self) -> String {
        match self {
            SelectionStrategy::NeedsReorder { .. } => "需补货商品".to_string(),
            SelectionStrategy::TopSold { limit } => format!("畅销前 {} 商品", limit),
            SelectionStrategy::DeadStock => "滞销商品".to_string(),
            SelectionStrategy::All => "全部商品".to_string(),
        }
    }

    /// 是否需要与外部订货清单对账
    pub fn is_reorder(&self) -> bool {
        matches!(self, SelectionStrategy::NeedsReorder { .. })
    }
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        SelectionStrategy::needs_reorder()
    }
}

impl std::str::FromStr for SelectionStrategy {
    type Err = String;

    /// 支持: reorder | reorder:1.5 | top:50 | top50 | dead-stock | all
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");

        if let Some(ratio) = normalized.strip_prefix("reorder:") {
            let ratio: f64 = ratio
                .parse()
                .map_err(|_| format!("无效补货比例: {}", ratio))?;
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(format!("补货比例必须为非负有限数: {}", ratio));
            }
            return Ok(SelectionStrategy::NeedsReorder { ratio });
        }

        if let Some(limit) = normalized
            .strip_prefix("top:")
            .or_else(|| normalized.strip_prefix("top"))
        {
            let limit: usize = limit
                .parse()
                .map_err(|_| format!("无效 TopN 数量: {}", limit))?;
            return Ok(SelectionStrategy::TopSold { limit });
        }

        match normalized.as_str() {
            "reorder" | "needs-reorder" => Ok(SelectionStrategy::needs_reorder()),
            "dead-stock" | "deadstock" => Ok(SelectionStrategy::DeadStock),
            "all" => Ok(SelectionStrategy::All),
            other => Err(format!("未知选择策略: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("reorder".parse::<SelectionStrategy>(), Ok(SelectionStrategy::needs_reorder()));
        assert_eq!(
            "reorder:1.5".parse::<SelectionStrategy>(),
            Ok(SelectionStrategy::NeedsReorder { ratio: 1.5 })
        );
        assert_eq!("top:50".parse::<SelectionStrategy>(), Ok(SelectionStrategy::TOP_50));
        assert_eq!("Top200".parse::<SelectionStrategy>(), Ok(SelectionStrategy::TOP_200));
        assert_eq!("dead_stock".parse::<SelectionStrategy>(), Ok(SelectionStrategy::DeadStock));
        assert_eq!("all".parse::<SelectionStrategy>(), Ok(SelectionStrategy::All));
        assert!("reorder:-1".parse::<SelectionStrategy>().is_err());
        assert!("cheapest".parse::<SelectionStrategy>().is_err());
    }

    #[test]
    fn test_export_stem() {
        assert_eq!(SelectionStrategy::default().export_stem(), "reorder_list");
        assert_eq!(SelectionStrategy::TOP_50.export_stem(), "top50");
        assert_eq!(SelectionStrategy::DeadStock.export_stem(), "dead_stock");
    }
}
