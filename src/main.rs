// ==========================================
// 库存补货分析 - 命令行入口
// ==========================================
// 用法:
//   inventory-reorder <盘点表> [--config 路径] [--strategy reorder|top:N|dead-stock|all]
//                     [--export csv|xlsx] [--out 目录] [--no-feeds] [--json-log]
//
// 流程: 上传 → 加载订货清单 → 视图 → 可选导出
// ==========================================

use anyhow::{bail, Context};
use inventory_reorder::app::{Notice, ReorderService, SessionState};
use inventory_reorder::config::ConfigManager;
use inventory_reorder::domain::{ReorderRecord, StatusSummary};
use inventory_reorder::engine::SelectionStrategy;
use inventory_reorder::export::ExportFormat;
use inventory_reorder::i18n::{set_locale, t, t_with_args};
use inventory_reorder::logging;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct CliArgs {
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    strategy: Option<SelectionStrategy>,
    export: Option<ExportFormat>,
    out_dir: Option<PathBuf>,
    no_feeds: bool,
    json_log: bool,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(next_value(&mut args, &arg)?)),
            "--strategy" => {
                let raw = next_value(&mut args, &arg)?;
                parsed.strategy = Some(raw.parse().map_err(anyhow::Error::msg)?);
            }
            "--export" => parsed.export = Some(next_value(&mut args, &arg)?.parse()?),
            "--out" => parsed.out_dir = Some(PathBuf::from(next_value(&mut args, &arg)?)),
            "--no-feeds" => parsed.no_feeds = true,
            "--json-log" => parsed.json_log = true,
            "-h" | "--help" => {
                println!("{}", t("cli.usage"));
                std::process::exit(0);
            }
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            other => {
                if parsed.input.is_some() {
                    bail!("只能指定一个盘点表: {}", other);
                }
                parsed.input = Some(PathBuf::from(other));
            }
        }
    }

    Ok(parsed)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
    args.next()
        .with_context(|| format!("参数 {} 缺少取值", flag))
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("{}", notice);
    }
}

fn print_records(records: &[ReorderRecord]) {
    if records.is_empty() {
        println!("{}", t("cli.empty"));
        return;
    }

    let code_width = records
        .iter()
        .map(|r| r.product_code().chars().count())
        .max()
        .unwrap_or(0)
        .max("Product Code".len());

    println!(
        "{:<code_width$}  {:>10}  {:>13}  {}",
        "Product Code", "Unit Sold", "Balance Stock", "Ordered"
    );
    for r in records {
        println!(
            "{:<code_width$}  {:>10}  {:>13}  {}",
            r.product_code(),
            r.record.unit_sold,
            r.record.balance_stock,
            r.ordered.map(|s| s.as_str()).unwrap_or("-"),
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    logging::init(args.json_log);

    let Some(input) = args.input.clone() else {
        eprintln!("{}", t("cli.usage"));
        std::process::exit(2);
    };

    let config = ConfigManager::load(args.config.as_deref())?.into_config();
    set_locale(&config.locale);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", inventory_reorder::APP_NAME, inventory_reorder::VERSION);
    tracing::info!("==================================================");

    let strategy = args.strategy.unwrap_or(SelectionStrategy::NeedsReorder {
        ratio: config.reorder.threshold_ratio,
    });
    let mut service = if args.no_feeds {
        ReorderService::offline(config)
    } else {
        ReorderService::new(config)
    };

    // === 上传 ===
    let outcome = service.upload_file(SessionState::default(), &input);
    print_notices(&outcome.notices);
    if !outcome.state.has_inventory() {
        std::process::exit(1);
    }
    let mut state = outcome.state;

    // === 订货清单 ===
    if !args.no_feeds && strategy.is_reorder() {
        let outcome = service.load_feeds(state);
        print_notices(&outcome.notices);
        state = outcome.state;
    }

    // === 视图 ===
    println!("{}", strategy.title_cn());
    let records = service.view(&state, strategy);
    print_records(&records);
    if state.catalog.is_loaded() && strategy.is_reorder() {
        let summary = StatusSummary::from_records(&records);
        println!(
            "{}",
            t_with_args(
                "cli.summary",
                &[
                    ("ordered", &summary.ordered.to_string()),
                    ("pending", &summary.pending.to_string()),
                ],
            )
        );
    }

    // === 导出 ===
    if let Some(format) = args.export {
        let captured_at = chrono::Local::now().naive_local();
        match service.export(&state, strategy, format, captured_at) {
            Ok(artifact) => {
                let dir = args.out_dir.unwrap_or_else(|| PathBuf::from("."));
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("无法创建输出目录 {}", dir.display()))?;
                let path = dir.join(&artifact.file_name);
                std::fs::write(&path, &artifact.bytes)
                    .with_context(|| format!("无法写入 {}", path.display()))?;
                print_notices(&[Notice::success(t_with_args(
                    "export.success",
                    &[("file", &path.display().to_string())],
                ))]);
            }
            Err(e) => {
                print_notices(&[Notice::error(t_with_args(
                    "export.failed",
                    &[("error", &e.to_string())],
                ))]);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
