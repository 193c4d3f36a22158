// ==========================================
// 仓储库存异常检测引擎 - 命令行入口
// ==========================================
// 输入: JSON 文档 { "config": WarehouseConfig, "records": [InventoryRecord], "now": ... }
// 输出: JSON 评估报告（stdout），日志写 stderr
// ==========================================

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use warehouse_anomaly::{logging, InventoryRecord, RuleEngine, WarehouseConfig};

/// 库存快照评估命令
#[derive(Parser, Debug)]
#[command(name = "warehouse-anomaly")]
#[command(about = "仓储库存异常检测 - 评估库存快照并输出异常检出", long_about = None)]
#[command(version)]
struct Cli {
    /// 评估请求 JSON 文件（"-" 表示 stdin）
    input: String,

    /// 仓库配置 JSON 文件（覆盖请求中的 config）
    #[arg(short, long, env = "WAREHOUSE_ANOMALY_CONFIG")]
    config: Option<PathBuf>,

    /// 评估时间（如 2025-03-01T12:00:00，默认取请求中的 now）
    #[arg(long)]
    now: Option<NaiveDateTime>,

    /// 只输出汇总
    #[arg(long)]
    summary_only: bool,

    /// 格式化输出
    #[arg(long)]
    pretty: bool,

    /// JSON 格式日志
    #[arg(long)]
    json_log: bool,
}

/// 评估请求文档
#[derive(Debug, Deserialize)]
struct AnalysisRequest {
    #[serde(default)]
    config: Option<WarehouseConfig>,
    records: Vec<InventoryRecord>,
    #[serde(default)]
    now: Option<NaiveDateTime>,
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("读取 stdin 失败")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("读取评估请求失败: {}", input))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("{} v{}", warehouse_anomaly::APP_NAME, warehouse_anomaly::VERSION);

    let raw = read_input(&cli.input)?;
    let request: AnalysisRequest =
        serde_json::from_str(&raw).context("评估请求 JSON 解析失败")?;

    let config = match &cli.config {
        Some(path) => WarehouseConfig::from_json_file(path)
            .with_context(|| format!("加载仓库配置失败: {}", path.display()))?,
        None => request
            .config
            .context("评估请求缺少 config，且未通过 --config 指定")?,
    };

    let now = cli
        .now
        .or(request.now)
        .unwrap_or_else(|| chrono::Local::now().naive_local());

    let engine = RuleEngine::new(config).context("仓库配置校验失败")?;
    let report = engine
        .evaluate_async(request.records, now)
        .await
        .context("库存快照评估失败")?;

    let output = match (cli.summary_only, cli.pretty) {
        (true, true) => serde_json::to_string_pretty(&report.summary)?,
        (true, false) => serde_json::to_string(&report.summary)?,
        (false, true) => serde_json::to_string_pretty(&report)?,
        (false, false) => serde_json::to_string(&report)?,
    };
    println!("{}", output);

    Ok(())
}
