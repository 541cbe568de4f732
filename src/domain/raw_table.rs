// ==========================================
// 库存补货分析 - 原始表格模型
// ==========================================
// 用途: 文件解析产物（上传盘点表 → 此结构 → 字段映射）
// 生命周期: 仅在一次上传处理流程内
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - 单元格值（弱类型）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// 空单元格或仅含空白的文本视为空
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// 文本化（整数值浮点数不带小数部分，空值为空串）
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Int(v) => v.to_string(),
            CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::from(value.as_str())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

// ==========================================
// RawTable - 原始数据集
// ==========================================
// 表头: 首个非空行；空白表头按列位置命名为 "Unnamed: {列号}"
// 数据行: 表头之后的所有行（保留空行，由提取器决定去留）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// 由原始表头行构建列名（补齐 Unnamed 占位并对重名追加 .1/.2 后缀）
    pub fn label_headers(header_cells: &[CellValue]) -> Vec<String> {
        let mut labels: Vec<String> = Vec::with_capacity(header_cells.len());
        for (idx, cell) in header_cells.iter().enumerate() {
            let base = match cell.as_text().trim() {
                "" => format!("Unnamed: {}", idx),
                text => text.to_string(),
            };

            let mut label = base.clone();
            let mut suffix = 1;
            while labels.contains(&label) {
                label = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            labels.push(label);
        }
        labels
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 取单元格（越界视为空）
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&CellValue::Empty)
    }

    pub fn last_row(&self) -> Option<&[CellValue]> {
        self.rows.last().map(|r| r.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_headers_unnamed_and_duplicates() {
        let cells = vec![
            CellValue::Text("Item".to_string()),
            CellValue::Empty,
            CellValue::Text("Item".to_string()),
            CellValue::Text("  ".to_string()),
        ];
        let labels = RawTable::label_headers(&cells);
        assert_eq!(labels, vec!["Item", "Unnamed: 1", "Item.1", "Unnamed: 3"]);
    }

    #[test]
    fn test_as_text_integral_float() {
        assert_eq!(CellValue::Float(12345.0).as_text(), "12345");
        assert_eq!(CellValue::Float(1.5).as_text(), "1.5");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_cell_out_of_bounds_is_empty() {
        let table = RawTable::new(vec!["A".to_string()], vec![vec![CellValue::Int(1)]]);
        assert_eq!(table.cell(0, 0), &CellValue::Int(1));
        assert_eq!(table.cell(0, 5), &CellValue::Empty);
        assert_eq!(table.cell(9, 0), &CellValue::Empty);
    }
}
