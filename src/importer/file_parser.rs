// ==========================================
// 库存补货分析 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls/.xlsm/.ods) / CSV (.csv)
// 约定: 列位置从 A 列起算，空白表头记为 "Unnamed: {列号}"
// ==========================================

use crate::domain::raw_table::{CellValue, RawTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info};

const EXCEL_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsm", "ods"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    fn parse_reader<R: Read>(&self, reader: R) -> ImportResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        let mut records = reader.records();
        let header_cells: Vec<CellValue> = match records.next() {
            Some(first) => first?.iter().map(|v| CellValue::from(v.trim())).collect(),
            None => return Err(ImportError::MalformedFile("CSV 文件为空".to_string())),
        };
        let headers = RawTable::label_headers(&header_cells);

        let mut rows = Vec::new();
        for result in records {
            let record = result?;
            rows.push(record.iter().map(CellValue::from).collect());
        }

        debug!(columns = headers.len(), rows = rows.len(), "CSV 解析完成");
        Ok(RawTable::new(headers, rows))
    }
}

impl FileParser for CsvParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        self.parse_reader(file)
    }

    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        self.parse_reader(bytes)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn convert(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::Int(v) => CellValue::Int(*v),
            Data::Float(v) => CellValue::Float(*v),
            Data::String(s) => CellValue::from(s.as_str()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Error(_) => CellValue::Empty,
            other => CellValue::Text(other.to_string()),
        }
    }

    /// 读取第一个工作表
    fn first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> ImportResult<Range<Data>> {
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::MalformedFile("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        debug!(sheet = %sheet_name, "读取工作表");
        Ok(range)
    }

    /// Range → RawTable（保留绝对列位置）
    fn range_to_table(range: &Range<Data>) -> ImportResult<RawTable> {
        let (Some((start_row, _)), Some((end_row, end_col))) = (range.start(), range.end()) else {
            return Err(ImportError::MalformedFile("Excel 文件为空".to_string()));
        };

        let read_row = |row: u32| -> Vec<CellValue> {
            (0..=end_col)
                .map(|col| {
                    range
                        .get_value((row, col))
                        .map(Self::convert)
                        .unwrap_or(CellValue::Empty)
                })
                .collect()
        };

        let headers = RawTable::label_headers(&read_row(start_row));
        let rows = ((start_row + 1)..=end_row).map(read_row).collect();

        Ok(RawTable::new(headers, rows))
    }
}

impl FileParser for ExcelParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        let range = Self::first_sheet(&mut workbook)?;
        Self::range_to_table(&range)
    }

    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let range = Self::first_sheet(&mut workbook)?;
        Self::range_to_table(&range)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    fn parser_for(ext: &str) -> ImportResult<Box<dyn FileParser>> {
        match ext {
            "csv" => Ok(Box::new(CsvParser)),
            e if EXCEL_EXTENSIONS.contains(&e) => Ok(Box::new(ExcelParser)),
            _ => Err(ImportError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        let table = Self::parser_for(&extension_of(path))?.parse_file(path)?;
        info!(
            file = %path.display(),
            rows = table.row_count(),
            columns = table.headers.len(),
            "文件解析完成"
        );
        Ok(table)
    }

    /// 解析上传内容（按文件名扩展名选择解析器）
    pub fn parse_upload(&self, file_name: &str, bytes: &[u8]) -> ImportResult<RawTable> {
        if bytes.is_empty() {
            return Err(ImportError::MalformedFile(format!("{} 为空文件", file_name)));
        }
        let table = Self::parser_for(&extension_of(Path::new(file_name)))?.parse_bytes(bytes)?;
        info!(
            file = %file_name,
            rows = table.row_count(),
            columns = table.headers.len(),
            "上传文件解析完成"
        );
        Ok(table)
    }
}
