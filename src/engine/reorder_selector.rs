// ==========================================
// 库存补货分析 - 补货选择器
// ==========================================
// 规则: unit_sold >= balance_stock * ratio（默认 ratio = 1.0，原始数量比较）
// 红线: 纯函数；稳定过滤，不隐式重排（TopN 策略除外）
// 说明: 结存 <= 0 且销量 > 0 的记录天然入选，无需特判
// ==========================================

use crate::domain::inventory::InventoryRecord;
use crate::engine::strategy::SelectionStrategy;
use tracing::debug;

pub struct ReorderSelector;

impl ReorderSelector {
    /// 是否满足补货条件
    pub fn qualifies(record: &InventoryRecord, ratio: f64) -> bool {
        if ratio == 1.0 {
            // 整数比较，避免大数精度问题
            return i128::from(record.unit_sold) >= i128::from(record.balance_stock);
        }
        record.unit_sold as f64 >= record.balance_stock as f64 * ratio
    }

    /// 按策略筛选
    pub fn select(records: &[InventoryRecord], strategy: SelectionStrategy) -> Vec<InventoryRecord> {
        let selected: Vec<InventoryRecord> = match strategy {
            SelectionStrategy::NeedsReorder { ratio } => records
                .iter()
                .filter(|r| Self::qualifies(r, ratio))
                .cloned()
                .collect(),
            SelectionStrategy::TopSold { limit } => {
                let mut ranked: Vec<&InventoryRecord> = records.iter().collect();
                // sort_by 为稳定排序：同销量保持原行序
                ranked.sort_by(|a, b| b.unit_sold.cmp(&a.unit_sold));
                ranked.into_iter().take(limit).cloned().collect()
            }
            SelectionStrategy::DeadStock => records
                .iter()
                .filter(|r| r.unit_sold == 0)
                .cloned()
                .collect(),
            SelectionStrategy::All => records.to_vec(),
        };

        debug!(
            strategy = ?strategy,
            input = records.len(),
            selected = selected.len(),
            "记录筛选完成"
        );
        selected
    }

    /// 默认补货筛选
    pub fn reorder_items(records: &[InventoryRecord]) -> Vec<InventoryRecord> {
        Self::select(records, SelectionStrategy::needs_reorder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(code: &str, sold: u64, stock: i64) -> InventoryRecord {
        InventoryRecord::new(code, sold, stock)
    }

    #[test]
    fn test_equal_qualifies() {
        assert!(ReorderSelector::qualifies(&rec("A100", 5, 5), 1.0));
        assert!(!ReorderSelector::qualifies(&rec("A101", 3, 10), 1.0));
    }

    #[test]
    fn test_zero_and_negative_stock_qualify() {
        assert!(ReorderSelector::qualifies(&rec("Z", 1, 0), 1.0));
        assert!(ReorderSelector::qualifies(&rec("N", 1, -4), 1.0));
        assert!(ReorderSelector::qualifies(&rec("N", 0, -4), 1.0));
    }

    #[test]
    fn test_ratio() {
        assert!(!ReorderSelector::qualifies(&rec("A", 5, 4), 1.5));
        assert!(ReorderSelector::qualifies(&rec("A", 6, 4), 1.5));
        assert!(ReorderSelector::qualifies(&rec("A", 2, 4), 0.5));
    }

    #[test]
    fn test_select_preserves_order() {
        let records = vec![rec("B", 9, 1), rec("A", 1, 9), rec("C", 4, 4)];
        let selected = ReorderSelector::reorder_items(&records);
        let codes: Vec<&str> = selected.iter().map(|r| r.product_code.as_str()).collect();
        assert_eq!(codes, vec!["B", "C"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(ReorderSelector::reorder_items(&[]).is_empty());
    }

    #[test]
    fn test_top_sold_ties_keep_row_order() {
        let records = vec![rec("A", 3, 0), rec("B", 7, 0), rec("C", 3, 0), rec("D", 1, 0)];
        let selected = ReorderSelector::select(&records, SelectionStrategy::TopSold { limit: 3 });
        let codes: Vec<&str> = selected.iter().map(|r| r.product_code.as_str()).collect();
        assert_eq!(codes, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_dead_stock() {
        let records = vec![rec("A", 0, 3), rec("B", 2, 0), rec("C", 0, 0)];
        let selected = ReorderSelector::select(&records, SelectionStrategy::DeadStock);
        assert_eq!(selected.len(), 2);
    }
}
