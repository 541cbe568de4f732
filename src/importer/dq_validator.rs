// ==========================================
// 库存补货分析 - 数据质量校验器实现
// ==========================================
// 职责: 统计质量信号（负库存、零销量）
// 红线: 仅诊断，不阻断处理
// ==========================================

use crate::domain::inventory::{InventoryRecord, QualityReport};
use crate::importer::importer_trait::DqValidator as DqValidatorTrait;
use tracing::{info, warn};

pub struct DqValidator;

impl DqValidatorTrait for DqValidator {
    fn inspect(&self, records: &[InventoryRecord], report: &mut QualityReport) {
        report.negative_stock_rows = records.iter().filter(|r| r.balance_stock < 0).count();
        report.zero_sold_rows = records.iter().filter(|r| r.unit_sold == 0).count();

        if report.negative_stock_rows > 0 {
            warn!(count = report.negative_stock_rows, "存在负库存记录");
        }
        if report.zero_sold_rows > 0 {
            info!(count = report.zero_sold_rows, "存在零销量记录");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_counts_signals() {
        let records = vec![
            InventoryRecord::new("A100", 0, -2),
            InventoryRecord::new("A101", 3, -1),
            InventoryRecord::new("A102", 0, 8),
            InventoryRecord::new("A103", 5, 5),
        ];
        let mut report = QualityReport::default();

        DqValidator.inspect(&records, &mut report);

        assert_eq!(report.negative_stock_rows, 2);
        assert_eq!(report.zero_sold_rows, 2);
    }

    #[test]
    fn test_inspect_empty() {
        let mut report = QualityReport::default();
        DqValidator.inspect(&[], &mut report);
        assert_eq!(report, QualityReport::default());
    }
}
