// ==========================================
// 库存补货分析 - Google Sheets 数据源
// ==========================================
// 接口: GET {api_base}/v4/spreadsheets/{id}/values/{range}
// 鉴权: 服务账号 JWT (RS256) 换取访问令牌；或预签发令牌
// 说明: 同步阻塞调用，沿用传输层默认超时，无自动重试（刷新由用户触发）
// ==========================================

use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::sheet_source::{SheetSource, StaticToken, TokenProvider};
use crate::config::SheetsSettings;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const TOKEN_LIFETIME_SECS: i64 = 3600;
// 令牌到期前提前换新的余量
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn build_http_client() -> CatalogResult<Client> {
    Ok(Client::builder()
        .user_agent(concat!("inventory-reorder/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

// ==========================================
// ServiceAccountKey - 服务账号凭据结构
// ==========================================
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> CatalogResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| CatalogError::Configuration(format!("服务账号凭据格式错误: {}", e)))
    }

    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Configuration(format!("无法读取凭据文件 {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }
}

#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

// ==========================================
// ServiceAccountTokenProvider
// ==========================================
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    http: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: ServiceAccountKey) -> CatalogResult<Self> {
        Ok(Self {
            key,
            http: build_http_client()?,
            cached: Mutex::new(None),
        })
    }

    fn signed_assertion(&self) -> CatalogResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            iss: &self.key.client_email,
            scope: SHEETS_READONLY_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &signing_key)?)
    }

    fn exchange(&self) -> CatalogResult<CachedToken> {
        let assertion = self.signed_assertion()?;
        let resp = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| CatalogError::Auth(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(CatalogError::Auth(format!("令牌交换失败 {}: {}", status, body)));
        }

        let token: TokenResponse = resp
            .json()
            .map_err(|e| CatalogError::Auth(format!("令牌响应无效: {}", e)))?;
        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(TOKEN_LIFETIME_SECS as u64));
        info!(client_email = %self.key.client_email, "服务账号令牌已更新");

        Ok(CachedToken {
            token: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}

impl TokenProvider for ServiceAccountTokenProvider {
    fn access_token(&self) -> CatalogResult<String> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|e| CatalogError::Auth(format!("锁获取失败: {}", e)))?;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN {
                return Ok(token.token.clone());
            }
        }

        let fresh = self.exchange()?;
        let value = fresh.token.clone();
        *cached = Some(fresh);
        Ok(value)
    }
}

// ==========================================
// GoogleSheetsClient
// ==========================================
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

pub struct GoogleSheetsClient {
    http: Client,
    api_base: String,
    spreadsheet_id: String,
    tokens: Box<dyn TokenProvider>,
}

impl GoogleSheetsClient {
    pub fn new(
        api_base: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        tokens: Box<dyn TokenProvider>,
    ) -> CatalogResult<Self> {
        Ok(Self {
            http: build_http_client()?,
            api_base: api_base.into(),
            spreadsheet_id: spreadsheet_id.into(),
            tokens,
        })
    }

    /// 由配置构建客户端
    ///
    /// # 返回
    /// - Err(Configuration): 凭据或表格 ID 缺失（不自动重试）
    pub fn from_settings(settings: &SheetsSettings) -> CatalogResult<Self> {
        let spreadsheet_id = settings
            .spreadsheet_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CatalogError::Configuration("spreadsheet_id".to_string()))?;

        let tokens: Box<dyn TokenProvider> = match (&settings.access_token, &settings.keyfile_path) {
            (Some(token), _) if !token.trim().is_empty() => {
                Box::new(StaticToken(token.trim().to_string()))
            }
            (_, Some(path)) => Box::new(ServiceAccountTokenProvider::new(
                ServiceAccountKey::from_file(path)?,
            )?),
            _ => return Err(CatalogError::Configuration("keyfile".to_string())),
        };

        Self::new(settings.api_base.clone(), spreadsheet_id, tokens)
    }

    fn values_url(&self, locator: &str) -> CatalogResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| CatalogError::Configuration(format!("api_base 无效: {}", e)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                CatalogError::Configuration(format!("api_base 无效: {}", self.api_base))
            })?;
            segments
                .pop_if_empty()
                .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", locator]);
        }
        Ok(url)
    }
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SheetSource for GoogleSheetsClient {
    #[instrument(skip(self))]
    fn fetch_values(&self, locator: &str) -> CatalogResult<Vec<Vec<String>>> {
        let url = self.values_url(locator)?;
        let token = self.tokens.access_token()?;

        debug!(url = %url, "请求远程表格");
        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .map_err(|e| CatalogError::remote(locator, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!(status = status.as_u16(), "远程表格返回错误状态");
            return Err(CatalogError::remote(
                locator,
                format!("HTTP {}: {}", status.as_u16(), body.trim()),
            ));
        }

        let range: ValueRange = resp
            .json()
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}
