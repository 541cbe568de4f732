// ==========================================
// 库存补货分析 - 字段映射器实现
// ==========================================
// 职责: 源列（固定位置标签）→ 规范列投影
// 说明: 列位置按约定固定，不做自动识别
// ==========================================

use crate::domain::raw_table::{CellValue, RawTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FieldMapper as FieldMapperTrait;
use serde::{Deserialize, Serialize};

// ==========================================
// ColumnMapping - 源列标签配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub product_code: String,
    pub unit_sold: String,
    pub balance_stock: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            product_code: "Unnamed: 1".to_string(),
            unit_sold: "Unnamed: 40".to_string(),
            balance_stock: "Unnamed: 61".to_string(),
        }
    }
}

impl ColumnMapping {
    /// 按 [产品编码, 销量, 结存] 顺序返回源列标签
    pub fn labels(&self) -> [&str; 3] {
        [
            self.product_code.as_str(),
            self.unit_sold.as_str(),
            self.balance_stock.as_str(),
        ]
    }
}

pub struct FieldMapper {
    mapping: ColumnMapping,
}

impl FieldMapper {
    pub fn new(mapping: ColumnMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(ColumnMapping::default())
    }
}

impl FieldMapperTrait for FieldMapper {
    fn missing_columns(&self, table: &RawTable) -> Vec<String> {
        self.mapping
            .labels()
            .iter()
            .filter(|label| table.column_index(label).is_none())
            .map(|label| label.to_string())
            .collect()
    }

    fn project(&self, table: &RawTable) -> ImportResult<Vec<[CellValue; 3]>> {
        let missing = self.missing_columns(table);
        if !missing.is_empty() {
            return Err(ImportError::SchemaMismatch { missing });
        }

        let [code_idx, sold_idx, stock_idx] = self
            .mapping
            .labels()
            .map(|label| table.column_index(label).unwrap_or_default());

        Ok((0..table.row_count())
            .map(|row| {
                [
                    table.cell(row, code_idx).clone(),
                    table.cell(row, sold_idx).clone(),
                    table.cell(row, stock_idx).clone(),
                ]
            })
            .collect())
    }
}
