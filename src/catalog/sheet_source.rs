// ==========================================
// 库存补货分析 - 远程表格数据源 Trait
// ==========================================
// 职责: 定义远程表格拉取接口（不包含实现）
// 实现者: GoogleSheetsClient；测试中为内存实现
// ==========================================

use crate::catalog::error::CatalogResult;

// ==========================================
// SheetSource Trait
// ==========================================
pub trait SheetSource: Send + Sync {
    /// 按定位符拉取二维单元格值
    ///
    /// # 参数
    /// - locator: 工作表名 + 单元格区域（如 "Shandong!A1:C200"）
    ///
    /// # 返回
    /// - Ok(Vec<Vec<String>>): 首行为表头，行长度可能不一致
    /// - Err: 网络/鉴权/服务错误
    fn fetch_values(&self, locator: &str) -> CatalogResult<Vec<Vec<String>>>;
}

// ==========================================
// TokenProvider Trait
// ==========================================
// 用途: 为远程请求提供 Bearer 访问令牌
// 实现者: ServiceAccountTokenProvider, StaticToken
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> CatalogResult<String>;
}

/// 预先签发的访问令牌
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn access_token(&self) -> CatalogResult<String> {
        Ok(self.0.clone())
    }
}
