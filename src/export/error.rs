// ==========================================
// 库存补货分析 - 导出错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel 写入失败: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("不支持的导出格式: {0}")]
    UnsupportedFormat(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
