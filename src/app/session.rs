// ==========================================
// 库存补货分析 - 会话状态
// ==========================================
// 职责: 显式会话状态（库存快照 + 外部订货清单）
// 红线: 每个动作只改动自己拥有的部分
//   - 上传 → inventory
//   - 加载/刷新 → catalog
//   - 全部清除 → 二者
// ==========================================

use crate::domain::{CatalogState, InventoryRecord, QualityReport};
use serde::{Deserialize, Serialize};

/// 单次上传的库存快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub source_name: String,
    pub file_size: usize,
    pub records: Vec<InventoryRecord>,
    /// 报表期间（0-2 个日期字符串）
    pub date_range: Vec<String>,
    pub quality: QualityReport,
}

impl InventorySnapshot {
    /// 是否与已上传文件相同（按文件名 + 大小判断）
    pub fn is_same_upload(&self, file_name: &str, file_size: usize) -> bool {
        self.source_name == file_name && self.file_size == file_size
    }

    /// 报表期间展示文本
    pub fn date_range_label(&self) -> Option<String> {
        match self.date_range.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            [start, end, ..] => Some(format!("{} - {}", start, end)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub inventory: Option<InventorySnapshot>,
    pub catalog: CatalogState,
}

impl SessionState {
    pub fn has_inventory(&self) -> bool {
        self.inventory.is_some()
    }

    pub fn records(&self) -> &[InventoryRecord] {
        self.inventory
            .as_ref()
            .map(|i| i.records.as_slice())
            .unwrap_or(&[])
    }
}
