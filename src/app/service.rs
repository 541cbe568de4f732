// ==========================================
// 库存补货分析 - 会话动作服务
// ==========================================
// 动作: 上传 / 加载订货清单 / 刷新 / 全部清除 / 视图 / 导出
// 模型: 单线程请求-响应，每次只有一个动作在执行
// 红线: 订货状态每次视图时按当前并集重新计算，不缓存
// ==========================================

use crate::app::notice::{ActionOutcome, Notice};
use crate::app::session::{InventorySnapshot, SessionState};
use crate::catalog::{reconcile, CatalogMerger, FeedCache, GoogleSheetsClient, SheetSource};
use crate::config::AppConfig;
use crate::domain::{CatalogState, FeedOutcome, ReorderRecord, StatusSummary};
use crate::engine::{ReorderSelector, SelectionStrategy};
use crate::export::{ExportArtifact, ExportFormat, ExportFormatter, ExportResult};
use crate::i18n::t_with_args;
use crate::importer::{
    extract_date_range, Extraction, ImportError, InventoryExtractor, UniversalFileParser,
};
use chrono::NaiveDateTime;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

type Session = ActionOutcome<SessionState>;

pub struct ReorderService {
    config: AppConfig,
    parser: UniversalFileParser,
    extractor: InventoryExtractor,
    merger: CatalogMerger,
    formatter: ExportFormatter,
    // Err: 远程表格配置缺失时的说明（记录一次，不重试）
    source: Result<Box<dyn SheetSource>, String>,
    cache: FeedCache,
}

impl ReorderService {
    /// 由配置创建，远程表格客户端按配置构建
    pub fn new(config: AppConfig) -> Self {
        let source = GoogleSheetsClient::from_settings(&config.sheets)
            .map(|client| Box::new(client) as Box<dyn SheetSource>)
            .map_err(|e| {
                warn!(error = %e, "远程表格不可用，订货状态对账已停用");
                e.to_string()
            });
        Self::build(config, source)
    }

    /// 使用指定数据源创建
    pub fn with_source(config: AppConfig, source: Box<dyn SheetSource>) -> Self {
        Self::build(config, Ok(source))
    }

    /// 不连接远程表格
    pub fn offline(config: AppConfig) -> Self {
        Self::build(config, Err("offline".to_string()))
    }

    fn build(config: AppConfig, source: Result<Box<dyn SheetSource>, String>) -> Self {
        Self {
            parser: UniversalFileParser,
            extractor: InventoryExtractor::with_mapping(
                config.columns.clone(),
                config.import.max_rows,
            ),
            merger: CatalogMerger::new(config.catalog.code_column.clone()),
            formatter: ExportFormatter::new(
                config.export.include_timestamp,
                config.export.sheet_name.clone(),
            ),
            cache: FeedCache::new(Duration::from_secs(config.catalog.cache_ttl_secs)),
            source,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 按配置阈值的补货策略
    pub fn default_strategy(&self) -> SelectionStrategy {
        SelectionStrategy::NeedsReorder {
            ratio: self.config.reorder.threshold_ratio,
        }
    }

    // ==========================================
    // 上传
    // ==========================================

    pub fn upload_file(&self, state: SessionState, path: &Path) -> Session {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match std::fs::read(path) {
            Ok(bytes) => self.upload_bytes(state, &file_name, &bytes),
            Err(e) => {
                let err = if e.kind() == std::io::ErrorKind::NotFound {
                    ImportError::FileNotFound(path.display().to_string())
                } else {
                    ImportError::from(e)
                };
                Self::upload_failed(state, &file_name, &err)
            }
        }
    }

    /// 上传文件内容
    ///
    /// - 与当前快照同名同大小: 视为重复上传，状态不变
    /// - 文件无法解析: 保留原有快照，返回错误提示
    /// - 缺少必需列: 以空记录替换快照，返回警告（列出缺失列）
    #[instrument(skip(self, state, bytes), fields(size = bytes.len()))]
    pub fn upload_bytes(&self, state: SessionState, file_name: &str, bytes: &[u8]) -> Session {
        if let Some(current) = &state.inventory {
            if current.is_same_upload(file_name, bytes.len()) {
                info!("重复上传，跳过处理");
                let notice = Notice::info(t_with_args("upload.unchanged", &[("file", file_name)]));
                return ActionOutcome::new(state, vec![notice]);
            }
        }

        let table = match self.parser.parse_upload(file_name, bytes) {
            Ok(table) => table,
            Err(e) => return Self::upload_failed(state, file_name, &e),
        };
        let mut snapshot = InventorySnapshot {
            source_name: file_name.to_string(),
            file_size: bytes.len(),
            date_range: extract_date_range(&table),
            ..InventorySnapshot::default()
        };

        let mut state = state;
        match self.extractor.extract(&table) {
            Ok(Extraction { records, quality }) => {
                snapshot.records = records;
                snapshot.quality = quality;
                state.inventory = Some(snapshot);
                let notices = self.upload_notices(&state);
                ActionOutcome::new(state, notices)
            }
            Err(ImportError::SchemaMismatch { missing }) => {
                let columns = missing.join(", ");
                warn!(file = %file_name, missing = %columns, "盘点表缺少必需列，结果为空");
                state.inventory = Some(snapshot);
                let notice = Notice::warning(t_with_args(
                    "upload.missing_columns",
                    &[("file", file_name), ("columns", &columns)],
                ));
                ActionOutcome::new(state, vec![notice])
            }
            Err(e) => Self::upload_failed(state, file_name, &e),
        }
    }

    fn upload_failed(state: SessionState, file_name: &str, err: &ImportError) -> Session {
        warn!(file = %file_name, error = %err, "上传处理失败");
        let notice = Notice::error(t_with_args(
            "upload.failed",
            &[("file", file_name), ("error", &err.to_string())],
        ));
        ActionOutcome::new(state, vec![notice])
    }

    fn upload_notices(&self, state: &SessionState) -> Vec<Notice> {
        let Some(snapshot) = &state.inventory else {
            return Vec::new();
        };
        let mut notices = vec![Notice::success(t_with_args(
            "upload.success",
            &[
                ("rows", &snapshot.records.len().to_string()),
                ("file", &snapshot.source_name),
            ],
        ))];

        match snapshot.date_range_label() {
            Some(range) => notices.push(Notice::info(t_with_args(
                "upload.date_range",
                &[("range", &range)],
            ))),
            None => notices.push(Notice::info(t_with_args("upload.no_date_range", &[]))),
        }

        let quality = &snapshot.quality;
        if quality.was_truncated() {
            notices.push(Notice::warning(t_with_args(
                "upload.truncated",
                &[
                    ("max", &self.extractor.max_rows().to_string()),
                    ("dropped", &quality.truncated_rows.to_string()),
                ],
            )));
        }
        if quality.negative_stock_rows > 0 {
            notices.push(Notice::warning(t_with_args(
                "upload.negative_stock",
                &[("count", &quality.negative_stock_rows.to_string())],
            )));
        }

        let reorder_count = self.view(state, self.default_strategy()).len();
        notices.push(Notice::info(t_with_args(
            "reorder.count",
            &[("count", &reorder_count.to_string())],
        )));
        notices
    }

    // ==========================================
    // 外部订货清单
    // ==========================================

    /// 加载订货清单（经缓存）
    pub fn load_feeds(&mut self, state: SessionState) -> Session {
        self.fetch_catalog(state, false)
    }

    /// 刷新: 清空缓存 → 全量拉取 → 重建并集
    pub fn refresh(&mut self, state: SessionState) -> Session {
        self.fetch_catalog(state, true)
    }

    #[instrument(skip(self, state))]
    fn fetch_catalog(&mut self, mut state: SessionState, force: bool) -> Session {
        let source = match &self.source {
            Ok(source) => source.as_ref(),
            Err(detail) => {
                state.catalog = CatalogState {
                    config_error: Some(detail.clone()),
                    ..CatalogState::default()
                };
                let notice =
                    Notice::warning(t_with_args("catalog.config_missing", &[("detail", detail)]));
                return ActionOutcome::new(state, vec![notice]);
            }
        };

        let feeds = &self.config.catalog.feeds;
        let now = Instant::now();
        state.catalog = if force {
            self.merger.refresh(source, &mut self.cache, feeds, now)
        } else {
            self.merger.load(source, &mut self.cache, feeds, now)
        };

        let key = if force { "catalog.refreshed" } else { "catalog.loaded" };
        let notices = catalog_notices(&state.catalog, self.merger.code_column(), key);
        ActionOutcome::new(state, notices)
    }

    // ==========================================
    // 全部清除
    // ==========================================

    pub fn clear_all(&mut self, _state: SessionState) -> Session {
        self.cache.invalidate_all();
        info!("会话状态已全部清除");
        ActionOutcome::new(
            SessionState::default(),
            vec![Notice::success(t_with_args("session.cleared", &[]))],
        )
    }

    // ==========================================
    // 视图与导出
    // ==========================================

    /// 按策略选择记录；补货策略且订货清单已加载时标记订货状态
    pub fn view(&self, state: &SessionState, strategy: SelectionStrategy) -> Vec<ReorderRecord> {
        let selected = ReorderSelector::select(state.records(), strategy);
        if strategy.is_reorder() && state.catalog.is_loaded() {
            reconcile(&selected, &state.catalog.union)
        } else {
            selected.into_iter().map(ReorderRecord::from).collect()
        }
    }

    /// 按策略视图的订货状态汇总（与同策略的 view 一致）
    pub fn status_summary(
        &self,
        state: &SessionState,
        strategy: SelectionStrategy,
    ) -> StatusSummary {
        StatusSummary::from_records(&self.view(state, strategy))
    }

    pub fn export(
        &self,
        state: &SessionState,
        strategy: SelectionStrategy,
        format: ExportFormat,
        captured_at: NaiveDateTime,
    ) -> ExportResult<ExportArtifact> {
        let records = self.view(state, strategy);
        self.formatter
            .export(&records, &strategy.export_stem(), format, captured_at)
    }
}

fn catalog_notices(
    catalog: &CatalogState,
    code_column: &str,
    summary_key: &str,
) -> Vec<Notice> {
    let mut notices: Vec<Notice> = catalog
        .feeds
        .iter()
        .filter_map(|snapshot| match &snapshot.outcome {
            FeedOutcome::Failed(error) => Some(Notice::warning(t_with_args(
                "catalog.feed_failed",
                &[("feed", &snapshot.feed.name), ("error", error)],
            ))),
            FeedOutcome::Loaded(_) if snapshot.missing_code_column => {
                Some(Notice::warning(t_with_args(
                    "catalog.feed_no_code_column",
                    &[("feed", &snapshot.feed.name), ("column", code_column)],
                )))
            }
            FeedOutcome::Loaded(_) => None,
        })
        .collect();

    let loaded = catalog.feeds.iter().filter(|f| f.table().is_some()).count();
    notices.push(Notice::success(t_with_args(
        summary_key,
        &[
            ("loaded", &loaded.to_string()),
            ("total", &catalog.feeds.len().to_string()),
            ("codes", &catalog.union.len().to_string()),
        ],
    )));
    notices
}
