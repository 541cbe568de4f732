// ==========================================
// 库存补货分析 - 库存提取器
// ==========================================
// 职责: 原始表格 → 规范库存记录
// 流程: 结构校验 → 列投影 → 去全空行 → 数值清洗 → 去无编码行 → 行数封顶 → DQ 统计
// ==========================================

use crate::domain::inventory::{InventoryRecord, QualityReport};
use crate::domain::raw_table::{CellValue, RawTable};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::dq_validator::DqValidator;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{ColumnMapping, FieldMapper};
use crate::importer::importer_trait::{
    DataCleaner as DataCleanerTrait, DqValidator as DqValidatorTrait,
    FieldMapper as FieldMapperTrait,
};
use tracing::{debug, info, instrument, warn};

/// 默认行数上限
pub const DEFAULT_MAX_ROWS: usize = 30_000;

// ==========================================
// Extraction - 提取结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<InventoryRecord>,
    pub quality: QualityReport,
}

// ==========================================
// InventoryExtractor
// ==========================================
pub struct InventoryExtractor {
    field_mapper: Box<dyn FieldMapperTrait>,
    data_cleaner: Box<dyn DataCleanerTrait>,
    dq_validator: Box<dyn DqValidatorTrait>,
    max_rows: usize,
}

impl InventoryExtractor {
    pub fn new(
        field_mapper: Box<dyn FieldMapperTrait>,
        data_cleaner: Box<dyn DataCleanerTrait>,
        dq_validator: Box<dyn DqValidatorTrait>,
        max_rows: usize,
    ) -> Self {
        Self {
            field_mapper,
            data_cleaner,
            dq_validator,
            max_rows,
        }
    }

    /// 使用默认清洗器/校验器
    pub fn with_mapping(mapping: ColumnMapping, max_rows: usize) -> Self {
        Self::new(
            Box::new(FieldMapper::new(mapping)),
            Box::new(DataCleaner),
            Box::new(DqValidator),
            max_rows,
        )
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// 提取规范库存记录
    ///
    /// # 返回
    /// - Ok(Extraction): 规范记录 + 质量信号
    /// - Err(SchemaMismatch): 必需列缺失（不输出部分结果）
    #[instrument(skip_all, fields(rows = table.row_count()))]
    pub fn extract(&self, table: &RawTable) -> ImportResult<Extraction> {
        // === 步骤 1-2: 结构校验 + 列投影 ===
        let projected = self.field_mapper.project(table).map_err(|e| {
            warn!(error = %e, "结构校验失败");
            e
        })?;

        let mut quality = QualityReport {
            rows_read: projected.len(),
            ..QualityReport::default()
        };

        // === 步骤 3: 去除全空行（版式残留） ===
        let non_blank: Vec<[CellValue; 3]> = projected
            .into_iter()
            .filter(|cells| !cells.iter().all(CellValue::is_blank))
            .collect();
        quality.blank_rows_dropped = quality.rows_read - non_blank.len();
        debug!(dropped = quality.blank_rows_dropped, "去除全空行");

        // === 步骤 4-6: 规范化 + 数值清洗 + 去除无编码行 ===
        let candidates = non_blank.len();
        let mut records: Vec<InventoryRecord> = non_blank
            .iter()
            .filter_map(|[code, sold, stock]| {
                let product_code = self.data_cleaner.clean_code(code)?;
                Some(InventoryRecord {
                    product_code,
                    unit_sold: self.data_cleaner.coerce_int(sold, 0).unsigned_abs(),
                    balance_stock: self.data_cleaner.coerce_int(stock, 0),
                })
            })
            .collect();
        quality.missing_code_dropped = candidates - records.len();
        if quality.missing_code_dropped > 0 {
            debug!(dropped = quality.missing_code_dropped, "去除无产品编码行");
        }

        // === 步骤 7: 行数封顶 ===
        if records.len() > self.max_rows {
            quality.truncated_rows = records.len() - self.max_rows;
            records.truncate(self.max_rows);
            warn!(
                max_rows = self.max_rows,
                truncated = quality.truncated_rows,
                "记录数超过上限，已截断"
            );
        }

        // === 质量信号 ===
        self.dq_validator.inspect(&records, &mut quality);

        info!(records = records.len(), "库存提取完成");
        Ok(Extraction { records, quality })
    }
}

impl Default for InventoryExtractor {
    fn default() -> Self {
        Self::with_mapping(ColumnMapping::default(), DEFAULT_MAX_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;

    fn canonical_table(rows: Vec<Vec<CellValue>>) -> RawTable {
        RawTable::new(
            vec!["Code".to_string(), "Sold".to_string(), "Stock".to_string()],
            rows,
        )
    }

    fn extractor(max_rows: usize) -> InventoryExtractor {
        InventoryExtractor::with_mapping(
            ColumnMapping {
                product_code: "Code".to_string(),
                unit_sold: "Sold".to_string(),
                balance_stock: "Stock".to_string(),
            },
            max_rows,
        )
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_extract_keeps_garbled_numbers_as_zero() {
        let table = canonical_table(vec![vec![text("A100"), text("lots"), text("?")]]);
        let extraction = extractor(10).extract(&table).unwrap();
        assert_eq!(extraction.records, vec![InventoryRecord::new("A100", 0, 0)]);
    }

    #[test]
    fn test_extract_drops_blank_and_codeless_rows() {
        let table = canonical_table(vec![
            vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
            vec![text(""), CellValue::Int(5), CellValue::Int(10)],
            vec![text("A100"), CellValue::Int(5), CellValue::Int(5)],
        ]);
        let extraction = extractor(10).extract(&table).unwrap();

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.quality.rows_read, 3);
        assert_eq!(extraction.quality.blank_rows_dropped, 1);
        assert_eq!(extraction.quality.missing_code_dropped, 1);
    }

    #[test]
    fn test_extract_keeps_duplicates() {
        let table = canonical_table(vec![
            vec![text("A100"), CellValue::Int(1), CellValue::Int(2)],
            vec![text("A100"), CellValue::Int(3), CellValue::Int(4)],
        ]);
        let extraction = extractor(10).extract(&table).unwrap();
        assert_eq!(extraction.records.len(), 2);
    }

    #[test]
    fn test_extract_truncates_at_ceiling() {
        let rows = (0..5)
            .map(|i| vec![text(&format!("P{}", i)), CellValue::Int(i), CellValue::Int(1)])
            .collect();
        let extraction = extractor(3).extract(&canonical_table(rows)).unwrap();

        assert_eq!(extraction.records.len(), 3);
        assert_eq!(extraction.records[2].product_code, "P2");
        assert_eq!(extraction.quality.truncated_rows, 2);
        assert!(extraction.quality.was_truncated());
    }

    #[test]
    fn test_extract_schema_mismatch() {
        let table = RawTable::new(vec!["Code".to_string()], vec![]);
        let result = extractor(10).extract(&table);
        assert!(matches!(
            result,
            Err(ImportError::SchemaMismatch { missing }) if missing == vec!["Sold".to_string(), "Stock".to_string()]
        ));
    }
}
