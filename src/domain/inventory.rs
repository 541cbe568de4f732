// ==========================================
// 库存补货分析 - 库存领域模型
// ==========================================
// 规范列名: Product Code / Unit Sold / Balance Stock
// 生命周期: 每次上传整体替换，仅存在于当前会话
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 规范列名
pub mod columns {
    pub const PRODUCT_CODE: &str = "Product Code";
    pub const UNIT_SOLD: &str = "Unit Sold";
    pub const BALANCE_STOCK: &str = "Balance Stock";
    pub const ORDERED: &str = "Ordered";
    pub const EXPORT_TIMESTAMP: &str = "Export_Timestamp";
}

// ==========================================
// InventoryRecord - 规范库存记录
// ==========================================
// 红线: product_code 非空且已 TRIM；unit_sold 恒 >= 0
// 说明: balance_stock 允许为负（数据质量信号，不是错误）
// 说明: 同一上传内 product_code 可重复，按行保留不合并
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "Product Code")]
    pub product_code: String,
    #[serde(rename = "Unit Sold")]
    pub unit_sold: u64,
    #[serde(rename = "Balance Stock")]
    pub balance_stock: i64,
}

impl InventoryRecord {
    pub fn new(product_code: impl Into<String>, unit_sold: u64, balance_stock: i64) -> Self {
        Self {
            product_code: product_code.into(),
            unit_sold,
            balance_stock,
        }
    }
}

// ==========================================
// OrderStatus - 订货状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Ordered,
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "Ordered",
            OrderStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ordered" => Ok(OrderStatus::Ordered),
            "pending" => Ok(OrderStatus::Pending),
            other => Err(format!("未知订货状态: {}", other)),
        }
    }
}

// ==========================================
// ReorderRecord - 补货记录
// ==========================================
// 用途: 选择器输出 + 对账标注
// ordered: 仅在与外部订货清单对账后填充
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRecord {
    #[serde(flatten)]
    pub record: InventoryRecord,
    #[serde(rename = "Ordered", skip_serializing_if = "Option::is_none")]
    pub ordered: Option<OrderStatus>,
}

impl ReorderRecord {
    pub fn product_code(&self) -> &str {
        &self.record.product_code
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.ordered = Some(status);
        self
    }
}

impl From<InventoryRecord> for ReorderRecord {
    fn from(record: InventoryRecord) -> Self {
        Self {
            record,
            ordered: None,
        }
    }
}

// ==========================================
// QualityReport - 提取质量信号
// ==========================================
// 仅用于诊断展示，不阻断处理
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub rows_read: usize,
    pub blank_rows_dropped: usize,
    pub missing_code_dropped: usize,
    pub negative_stock_rows: usize,
    pub zero_sold_rows: usize,
    pub truncated_rows: usize,
}

impl QualityReport {
    pub fn was_truncated(&self) -> bool {
        self.truncated_rows > 0
    }
}

// ==========================================
// StatusSummary - 订货状态汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub ordered: usize,
    pub pending: usize,
    pub unstamped: usize,
}

impl StatusSummary {
    pub fn from_records(records: &[ReorderRecord]) -> Self {
        records
            .iter()
            .fold(StatusSummary::default(), |mut acc, r| {
                match r.ordered {
                    Some(OrderStatus::Ordered) => acc.ordered += 1,
                    Some(OrderStatus::Pending) => acc.pending += 1,
                    None => acc.unstamped += 1,
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_from_str() {
        assert_eq!("Ordered".parse::<OrderStatus>(), Ok(OrderStatus::Ordered));
        assert_eq!(" pending ".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert!("maybe".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_summary() {
        let records = vec![
            ReorderRecord::from(InventoryRecord::new("A100", 5, 5)).with_status(OrderStatus::Ordered),
            ReorderRecord::from(InventoryRecord::new("C300", 9, 1)).with_status(OrderStatus::Pending),
            ReorderRecord::from(InventoryRecord::new("D400", 2, 0)),
        ];
        let summary = StatusSummary::from_records(&records);
        assert_eq!(summary.ordered, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.unstamped, 1);
    }
}
