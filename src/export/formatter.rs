// ==========================================
// 库存补货分析 - 导出格式化器
// ==========================================
// 输出: CSV (UTF-8, 含表头) / XLSX (单工作表)
// 文件名: {前缀}_{YYYYmmdd_HHMMSS}.{csv|xlsx}
// ==========================================

use crate::export::error::{ExportError, ExportResult};
use crate::export::table::{ExportCell, ExportTable};
use crate::domain::ReorderRecord;
use chrono::NaiveDateTime;
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// 默认工作表名
pub const DEFAULT_SHEET_NAME: &str = "Reorder_List";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// 可下载的导出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

pub fn to_csv_bytes(table: &ExportTable) -> ExportResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(ExportCell::to_text))?;
    }
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

pub fn to_xlsx_bytes(table: &ExportTable, sheet_name: &str) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (idx, row) in table.rows.iter().enumerate() {
        let row_num = (idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                ExportCell::Text(s) => {
                    worksheet.write_string(row_num, col as u16, s)?;
                }
                ExportCell::Int(v) => {
                    worksheet.write_number(row_num, col as u16, *v as f64)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

// ==========================================
// ExportFormatter
// ==========================================
pub struct ExportFormatter {
    include_timestamp: bool,
    sheet_name: String,
}

impl ExportFormatter {
    pub fn new(include_timestamp: bool, sheet_name: impl Into<String>) -> Self {
        Self {
            include_timestamp,
            sheet_name: sheet_name.into(),
        }
    }

    /// 导出记录集合
    ///
    /// # 参数
    /// - stem: 文件名前缀（随选择策略变化）
    /// - captured_at: 导出时刻，用于时间戳列与文件名
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn export(
        &self,
        records: &[ReorderRecord],
        stem: &str,
        format: ExportFormat,
        captured_at: NaiveDateTime,
    ) -> ExportResult<ExportArtifact> {
        let timestamp = self.include_timestamp.then_some(captured_at);
        let table = ExportTable::from_records(records, timestamp);

        let bytes = match format {
            ExportFormat::Csv => to_csv_bytes(&table)?,
            ExportFormat::Xlsx => to_xlsx_bytes(&table, &self.sheet_name)?,
        };
        let file_name = format!(
            "{}_{}.{}",
            stem,
            captured_at.format("%Y%m%d_%H%M%S"),
            format.extension()
        );

        info!(file_name = %file_name, bytes = bytes.len(), "导出完成");
        Ok(ExportArtifact {
            file_name,
            mime: format.mime(),
            bytes,
        })
    }
}

impl Default for ExportFormatter {
    fn default() -> Self {
        Self::new(true, DEFAULT_SHEET_NAME)
    }
}
