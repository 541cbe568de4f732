// ==========================================
// 库存补货分析 - 导入管道 Trait
// ==========================================
// 职责: 定义导入各阶段接口（不包含实现）
// 管道: 文件解析 → 字段映射 → 数值清洗 → DQ 统计
// ==========================================

use crate::domain::inventory::{InventoryRecord, QualityReport};
use crate::domain::raw_table::{CellValue, RawTable};
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表格
    ///
    /// # 返回
    /// - Ok(RawTable): 表头 + 数据行（保留列位置）
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable>;

    /// 解析上传的内存字节
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 列投影接口（阶段 1）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 校验必需列是否齐全
    ///
    /// # 返回
    /// - 缺失列名列表（按配置顺序），齐全时为空
    fn missing_columns(&self, table: &RawTable) -> Vec<String>;

    /// 仅投影三列必需列（产品编码、销量、结存）
    ///
    /// # 返回
    /// - Err(SchemaMismatch): 必需列缺失
    fn project(&self, table: &RawTable) -> ImportResult<Vec<[CellValue; 3]>>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗接口（阶段 2）
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 单元格 → 整数，失败返回 fallback（不传播错误）
    fn coerce_int(&self, value: &CellValue, fallback: i64) -> i64;

    /// 单元格 → 浮点数（严格变体），失败返回 fallback
    fn coerce_float(&self, value: &CellValue, fallback: f64) -> f64;

    /// 产品编码清洗（TRIM，空白 → None）
    fn clean_code(&self, value: &CellValue) -> Option<String>;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 数据质量统计接口（阶段 3）
// 实现者: DqValidator
pub trait DqValidator: Send + Sync {
    /// 统计质量信号（负库存、零销量），写入 report
    fn inspect(&self, records: &[InventoryRecord], report: &mut QualityReport);
}
