// ==========================================
// 库存补货分析 - 外部订货清单错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 外部订货清单错误类型
#[derive(Error, Debug)]
pub enum CatalogError {
    // ===== 配置错误（仅使 feed 加载功能失效，不自动重试） =====
    #[error("远程表格配置缺失: {0}")]
    Configuration(String),

    // ===== 鉴权错误 =====
    #[error("服务账号鉴权失败: {0}")]
    Auth(String),

    // ===== 远程拉取错误（按 feed 恢复） =====
    #[error("远程表格拉取失败 ({locator}): {message}")]
    RemoteFetch { locator: String, message: String },

    #[error("远程表格响应无效: {0}")]
    InvalidResponse(String),
}

impl CatalogError {
    pub fn remote(locator: &str, message: impl Into<String>) -> Self {
        CatalogError::RemoteFetch {
            locator: locator.to_string(),
            message: message.into(),
        }
    }
}

// 实现 From<reqwest::Error>
impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        let locator = err
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        CatalogError::RemoteFetch {
            locator,
            message: err.to_string(),
        }
    }
}

// 实现 From<jsonwebtoken::errors::Error>
impl From<jsonwebtoken::errors::Error> for CatalogError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        CatalogError::Auth(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::InvalidResponse(err.to_string())
    }
}

/// Result 类型别名
pub type CatalogResult<T> = Result<T, CatalogError>;
