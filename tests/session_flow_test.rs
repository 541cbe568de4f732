// ==========================================
// 会话流程端到端测试
// ==========================================
// 测试目标: 上传 → 加载订货清单 → 对账 → 刷新 → 导出 → 全部清除
// ==========================================


use chrono::NaiveDate;
use inventory_reorder::app::{NoticeLevel, ReorderService, SessionState};
use inventory_reorder::config::AppConfig;
use inventory_reorder::domain::{FeedConfig, InventoryRecord, OrderStatus};
use inventory_reorder::engine::SelectionStrategy;
use inventory_reorder::export::ExportFormat;
use inventory_reorder::importer::{ColumnMapping, InventoryExtractor, UniversalFileParser};
use inventory_reorder::logging;
use test_helpers::{
    narrow_workbook_bytes, stock_workbook_bytes, write_file, SharedSheetSource, StockRow,
};

const FOOTER: &str = "Period: 2024-05-01 ~ 2024-05-31";

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.catalog.feeds = vec![
        FeedConfig::new("DF Items", "Loose Cargo!A1:C200"),
        FeedConfig::new("Shandong Items", "Shandong!A1:C200"),
    ];
    config
}

fn stock_rows() -> Vec<StockRow<'static>> {
    vec![
        ("A100", 10.0, 5.0),
        ("B200", 2.0, 9.0),
        ("C300", 4.0, 4.0),
        ("D400", 0.0, 0.0),
    ]
}

fn canonical_mapping() -> ColumnMapping {
    ColumnMapping {
        product_code: "Product Code".to_string(),
        unit_sold: "Unit Sold".to_string(),
        balance_stock: "Balance Stock".to_string(),
    }
}

fn status_of(service: &ReorderService, state: &SessionState, code: &str) -> Option<OrderStatus> {
    service
        .view(state, service.default_strategy())
        .into_iter()
        .find(|r| r.product_code() == code)
        .and_then(|r| r.ordered)
}

fn uploaded(service: &ReorderService) -> SessionState {
    let bytes = stock_workbook_bytes(&stock_rows(), Some(FOOTER));
    let outcome = service.upload_bytes(SessionState::default(), "stock.xlsx", &bytes);
    assert!(!outcome.has_errors());
    outcome.state
}

#[test]
fn test_upload_builds_snapshot() {
    logging::init_test();
    let service = ReorderService::offline(config());
    let state = uploaded(&service);

    let snapshot = state.inventory.as_ref().unwrap();
    assert_eq!(snapshot.records.len(), 4);
    assert_eq!(
        snapshot.date_range,
        vec!["2024-05-01".to_string(), "2024-05-31".to_string()]
    );

    let reorder = service.view(&state, service.default_strategy());
    let codes: Vec<&str> = reorder.iter().map(|r| r.product_code()).collect();
    assert_eq!(codes, vec!["A100", "C300", "D400"]);
    assert!(reorder.iter().all(|r| r.ordered.is_none()));
}

#[test]
fn test_reupload_same_file_is_noop() {
    let service = ReorderService::offline(config());
    let bytes = stock_workbook_bytes(&stock_rows(), Some(FOOTER));
    let state = service
        .upload_bytes(SessionState::default(), "stock.xlsx", &bytes)
        .state;

    let outcome = service.upload_bytes(state.clone(), "stock.xlsx", &bytes);
    assert_eq!(outcome.state, state);
    assert_eq!(outcome.notices.len(), 1);
    assert_eq!(outcome.notices[0].level, NoticeLevel::Info);
}

#[test]
fn test_unreadable_upload_keeps_previous_snapshot() {
    let service = ReorderService::offline(config());
    let state = uploaded(&service);

    let outcome = service.upload_bytes(state.clone(), "june.xlsx", b"not a workbook");
    assert!(outcome.has_errors());
    assert_eq!(outcome.state, state);
}

#[test]
fn test_upload_missing_columns_replaces_snapshot() {
    let service = ReorderService::offline(config());
    let state = uploaded(&service);

    let bytes = narrow_workbook_bytes(10);
    let outcome = service.upload_bytes(state, "june.xlsx", &bytes);
    assert!(!outcome.has_errors());
    assert!(outcome.has_warnings());
    assert!(outcome.notices[0].message.contains("Unnamed: 40"));
    assert!(outcome.notices[0].message.contains("Unnamed: 61"));

    let snapshot = outcome.state.inventory.as_ref().unwrap();
    assert_eq!(snapshot.source_name, "june.xlsx");
    assert_eq!(snapshot.file_size, bytes.len());
    assert!(snapshot.records.is_empty());
    assert!(service
        .view(&outcome.state, service.default_strategy())
        .is_empty());
}

#[test]
fn test_upload_missing_file_is_notice() {
    let service = ReorderService::offline(config());
    let dir = tempfile::tempdir().unwrap();
    let outcome = service.upload_file(SessionState::default(), &dir.path().join("absent.xlsx"));
    assert!(outcome.has_errors());
    assert!(!outcome.state.has_inventory());
}

#[test]
fn test_upload_from_disk() {
    let service = ReorderService::offline(config());
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "stock.xlsx",
        &stock_workbook_bytes(&stock_rows(), Some(FOOTER)),
    );

    let outcome = service.upload_file(SessionState::default(), &path);
    assert_eq!(outcome.state.inventory.unwrap().source_name, "stock.xlsx");
}

#[test]
fn test_reconcile_and_refresh_rebuilds_union() {
    let source = SharedSheetSource::default();
    source.put("Loose Cargo!A1:C200", &["A100"]);
    source.put("Shandong!A1:C200", &["A100", "C300"]);

    let mut service = ReorderService::with_source(config(), Box::new(source.clone()));
    let state = uploaded(&service);

    let outcome = service.load_feeds(state);
    assert!(!outcome.has_warnings());
    let state = outcome.state;
    assert_eq!(status_of(&service, &state, "A100"), Some(OrderStatus::Ordered));
    assert_eq!(status_of(&service, &state, "C300"), Some(OrderStatus::Ordered));
    assert_eq!(status_of(&service, &state, "D400"), Some(OrderStatus::Pending));

    let summary = service.status_summary(&state, service.default_strategy());
    assert_eq!((summary.ordered, summary.pending), (2, 1));

    // 上游移除 C300，缓存期内加载仍沿用旧结果
    source.put("Shandong!A1:C200", &["A100"]);
    let cached = service.load_feeds(state);
    assert_eq!(status_of(&service, &cached.state, "C300"), Some(OrderStatus::Ordered));

    // 刷新后旧编码不得残留
    let refreshed = service.refresh(cached.state);
    assert!(!refreshed.state.catalog.contains("C300"));
    assert_eq!(
        status_of(&service, &refreshed.state, "C300"),
        Some(OrderStatus::Pending)
    );
    assert_eq!(source.calls(), 4);
}

#[test]
fn test_feed_failure_does_not_abort_others() {
    let source = SharedSheetSource::default();
    source.put("Shandong!A1:C200", &["B200", "C300"]);

    let mut service = ReorderService::with_source(config(), Box::new(source.clone()));
    let outcome = service.load_feeds(uploaded(&service));

    assert!(outcome.has_warnings());
    let warnings = outcome
        .notices
        .iter()
        .filter(|n| n.level == NoticeLevel::Warning)
        .count();
    assert_eq!(warnings, 1);
    assert_eq!(
        status_of(&service, &outcome.state, "C300"),
        Some(OrderStatus::Ordered)
    );
}

#[test]
fn test_reupload_restamps_against_current_union() {
    let source = SharedSheetSource::default();
    source.put("Loose Cargo!A1:C200", &["E500"]);
    source.put("Shandong!A1:C200", &[]);

    let mut service = ReorderService::with_source(config(), Box::new(source));
    let state = service.load_feeds(uploaded(&service)).state;
    assert_eq!(status_of(&service, &state, "E500"), None);

    let rows: Vec<StockRow> = vec![("E500", 8.0, 1.0)];
    let outcome = service.upload_bytes(state, "stock_june.xlsx", &stock_workbook_bytes(&rows, None));
    assert_eq!(
        status_of(&service, &outcome.state, "E500"),
        Some(OrderStatus::Ordered)
    );
}

#[test]
fn test_clear_all_forces_reupload() {
    let source = SharedSheetSource::default();
    source.put("Loose Cargo!A1:C200", &["A100"]);
    source.put("Shandong!A1:C200", &[]);

    let mut service = ReorderService::with_source(config(), Box::new(source.clone()));
    let state = service.load_feeds(uploaded(&service)).state;

    let cleared = service.clear_all(state);
    assert!(!cleared.state.has_inventory());
    assert!(!cleared.state.catalog.is_loaded());
    assert!(service.view(&cleared.state, service.default_strategy()).is_empty());

    // 缓存已清空，再次加载会重新请求
    let before = source.calls();
    service.load_feeds(cleared.state);
    assert_eq!(source.calls(), before + 2);
}

#[test]
fn test_csv_export_round_trip() {
    let source = SharedSheetSource::default();
    source.put("Loose Cargo!A1:C200", &["A100"]);
    source.put("Shandong!A1:C200", &[]);

    let mut service = ReorderService::with_source(config(), Box::new(source));
    let state = service.load_feeds(uploaded(&service)).state;
    let captured_at = NaiveDate::from_ymd_opt(2024, 6, 3)
        .unwrap()
        .and_hms_opt(14, 0, 9)
        .unwrap();

    let artifact = service
        .export(&state, service.default_strategy(), ExportFormat::Csv, captured_at)
        .unwrap();
    assert_eq!(artifact.file_name, "reorder_list_20240603_140009.csv");

    let table = UniversalFileParser
        .parse_upload(&artifact.file_name, &artifact.bytes)
        .unwrap();
    assert_eq!(
        table.headers,
        vec!["Product Code", "Unit Sold", "Balance Stock", "Ordered", "Export_Timestamp"]
    );
    let records = InventoryExtractor::with_mapping(canonical_mapping(), 100)
        .extract(&table)
        .unwrap()
        .records;
    assert_eq!(
        records,
        vec![
            InventoryRecord::new("A100", 10, 5),
            InventoryRecord::new("C300", 4, 4),
            InventoryRecord::new("D400", 0, 0),
        ]
    );

    let ordered = table.column_index("Ordered").unwrap();
    assert_eq!(table.cell(0, ordered).as_text(), "Ordered");
    assert_eq!(table.cell(1, ordered).as_text(), "Pending");
}

#[test]
fn test_xlsx_export_round_trip() {
    let service = ReorderService::offline(config());
    let state = uploaded(&service);
    let captured_at = NaiveDate::from_ymd_opt(2024, 6, 3)
        .unwrap()
        .and_hms_opt(14, 0, 9)
        .unwrap();

    let artifact = service
        .export(&state, SelectionStrategy::All, ExportFormat::Xlsx, captured_at)
        .unwrap();
    assert_eq!(artifact.file_name, "all_products_20240603_140009.xlsx");

    let table = UniversalFileParser
        .parse_upload(&artifact.file_name, &artifact.bytes)
        .unwrap();
    assert_eq!(table.headers.last().map(String::as_str), Some("Export_Timestamp"));

    let records = InventoryExtractor::with_mapping(canonical_mapping(), 100)
        .extract(&table)
        .unwrap()
        .records;
    assert_eq!(records, state.inventory.unwrap().records);
}
