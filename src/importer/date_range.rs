// ==========================================
// 库存补货分析 - 报表期间提取
// ==========================================
// 启发式: 只看原始表格最后一行的首个单元格
// 匹配: 数字斜杠日期（01/05/2024）与 ISO 日期（2024-05-01）
// 说明: 仅用于展示，不参与补货计算
// ==========================================

use crate::domain::raw_table::RawTable;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// 最多返回的日期数
const MAX_DATES: usize = 2;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\d{1,2}/\d{1,2}/\d{2,4}|\d{4}-\d{2}-\d{2}").expect("日期正则无效")
    })
}

/// 从文本中提取日期子串（按出现顺序去重，最多两个）
pub fn find_dates(text: &str) -> Vec<String> {
    let mut dates: Vec<String> = Vec::with_capacity(MAX_DATES);
    for m in date_pattern().find_iter(text) {
        if dates.len() == MAX_DATES {
            break;
        }
        if !dates.iter().any(|d| d == m.as_str()) {
            dates.push(m.as_str().to_string());
        }
    }
    dates
}

/// 从原始表格最后一行首个单元格提取报表期间
///
/// # 返回
/// - 0 个: 无可展示日期
/// - 1 个: 单日
/// - 2 个: 起止期间
pub fn extract_date_range(table: &RawTable) -> Vec<String> {
    let Some(first_cell) = table.last_row().and_then(|row| row.first()) else {
        return Vec::new();
    };

    let dates = find_dates(&first_cell.as_text());
    debug!(?dates, "报表期间提取");
    dates
}
