// ==========================================
// 库存补货分析 - 导出表构建
// ==========================================
// 列顺序: Product Code, Unit Sold, Balance Stock, [Ordered], [Export_Timestamp]
// 红线: 整数列保持整数，不做有损收窄
// ==========================================

use crate::domain::{columns, ReorderRecord};
use chrono::NaiveDateTime;

/// 导出时间戳格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub enum ExportCell {
    Text(String),
    Int(i64),
}

impl ExportCell {
    pub fn to_text(&self) -> String {
        match self {
            ExportCell::Text(s) => s.clone(),
            ExportCell::Int(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ExportCell>>,
}

impl ExportTable {
    /// 由记录集合构建导出表
    ///
    /// - 任一记录带订货状态时追加 Ordered 列（未标记记录留空）
    /// - timestamp 存在时追加 Export_Timestamp 列，所有行同值
    pub fn from_records(records: &[ReorderRecord], timestamp: Option<NaiveDateTime>) -> Self {
        let with_status = records.iter().any(|r| r.ordered.is_some());
        let stamp = timestamp.map(|t| t.format(TIMESTAMP_FORMAT).to_string());

        let mut headers: Vec<String> = [
            columns::PRODUCT_CODE,
            columns::UNIT_SOLD,
            columns::BALANCE_STOCK,
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();
        if with_status {
            headers.push(columns::ORDERED.to_string());
        }
        if stamp.is_some() {
            headers.push(columns::EXPORT_TIMESTAMP.to_string());
        }

        let rows = records
            .iter()
            .map(|r| {
                let mut row = vec![
                    ExportCell::Text(r.record.product_code.clone()),
                    ExportCell::Int(i64::try_from(r.record.unit_sold).unwrap_or(i64::MAX)),
                    ExportCell::Int(r.record.balance_stock),
                ];
                if with_status {
                    let status = r.ordered.map(|s| s.as_str().to_string()).unwrap_or_default();
                    row.push(ExportCell::Text(status));
                }
                if let Some(s) = &stamp {
                    row.push(ExportCell::Text(s.clone()));
                }
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InventoryRecord, OrderStatus};
    use chrono::NaiveDate;

    #[test]
    fn test_plain_columns_without_status() {
        let records = vec![ReorderRecord::from(InventoryRecord::new("A100", 10, 5))];
        let table = ExportTable::from_records(&records, None);
        assert_eq!(table.headers, vec!["Product Code", "Unit Sold", "Balance Stock"]);
        assert_eq!(table.rows[0][1], ExportCell::Int(10));
    }

    #[test]
    fn test_status_and_timestamp_columns() {
        let records = vec![
            ReorderRecord::from(InventoryRecord::new("A100", 10, 5)).with_status(OrderStatus::Ordered),
            ReorderRecord::from(InventoryRecord::new("C300", 4, -1)),
        ];
        let ts = NaiveDate::from_ymd_opt(2024, 5, 31)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let table = ExportTable::from_records(&records, Some(ts));

        assert_eq!(table.headers[3], "Ordered");
        assert_eq!(table.headers[4], "Export_Timestamp");
        assert_eq!(table.rows[0][3], ExportCell::Text("Ordered".to_string()));
        assert_eq!(table.rows[1][3], ExportCell::Text(String::new()));
        assert_eq!(table.rows[1][4].to_text(), "2024-05-31 08:30:00");
        assert_eq!(table.rows[1][2], ExportCell::Int(-1));
    }
}
