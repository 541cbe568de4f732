// ==========================================
// 库存补货分析 - 数据清洗器实现
// ==========================================
// 职责: 数值容错转换 / 产品编码 TRIM / NULL 标准化
// 红线: 单个坏单元格不得中断整个导入（失败回退默认值）
// ==========================================

use crate::domain::raw_table::CellValue;
use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn coerce_int(&self, value: &CellValue, fallback: i64) -> i64 {
        match value {
            CellValue::Int(v) => *v,
            CellValue::Float(f) => float_to_int(*f).unwrap_or(fallback),
            CellValue::Bool(b) => i64::from(*b),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_int))
                    .unwrap_or(fallback)
            }
            CellValue::Empty => fallback,
        }
    }

    fn coerce_float(&self, value: &CellValue, fallback: f64) -> f64 {
        let parsed = match value {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Empty => None,
        };
        parsed.filter(|f| f.is_finite()).unwrap_or(fallback)
    }

    fn clean_code(&self, value: &CellValue) -> Option<String> {
        if value.is_blank() {
            return None;
        }
        let text = value.as_text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// 浮点数向零截断为整数（NaN/无穷/越界视为失败）
fn float_to_int(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let truncated = f.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_int_variants() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.coerce_int(&CellValue::Int(7), 0), 7);
        assert_eq!(cleaner.coerce_int(&CellValue::Float(7.9), 0), 7);
        assert_eq!(cleaner.coerce_int(&CellValue::Float(-7.9), 0), -7);
        assert_eq!(cleaner.coerce_int(&CellValue::Text(" 12 ".to_string()), 0), 12);
        assert_eq!(cleaner.coerce_int(&CellValue::Text("3.0".to_string()), 0), 3);
        assert_eq!(cleaner.coerce_int(&CellValue::Bool(true), 0), 1);
    }

    #[test]
    fn test_coerce_int_fallback() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.coerce_int(&CellValue::Empty, 0), 0);
        assert_eq!(cleaner.coerce_int(&CellValue::Text("n/a".to_string()), -1), -1);
        assert_eq!(cleaner.coerce_int(&CellValue::Float(f64::NAN), 0), 0);
        assert_eq!(cleaner.coerce_int(&CellValue::Float(1e30), 0), 0);
        assert_eq!(cleaner.coerce_int(&CellValue::Text("1,200".to_string()), 0), 0);
    }

    #[test]
    fn test_coerce_float_strict() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.coerce_float(&CellValue::Text("2.5".to_string()), 0.0), 2.5);
        assert_eq!(cleaner.coerce_float(&CellValue::Text("inf".to_string()), 0.0), 0.0);
        assert_eq!(cleaner.coerce_float(&CellValue::Empty, 9.0), 9.0);
    }

    #[test]
    fn test_clean_code() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.clean_code(&CellValue::Text("  A100 ".to_string())),
            Some("A100".to_string())
        );
        assert_eq!(cleaner.clean_code(&CellValue::Float(12345.0)), Some("12345".to_string()));
        assert_eq!(cleaner.clean_code(&CellValue::Text("   ".to_string())), None);
        assert_eq!(cleaner.clean_code(&CellValue::Empty), None);
    }
}
