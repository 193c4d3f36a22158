// ==========================================
// 仓储库存异常检测引擎 - 规则引擎编排器
// ==========================================
// 主流程: 快照校验 → 库位分类/占用统计/批次统计 → 八条规则 → 合并排序 → 汇总
// 并发: 记录数超过 parallel_threshold 时每条规则一个作用域线程，否则顺序执行
// 红线: 一次评估要么完整返回，要么整体失败；now 由调用方传入
// ==========================================

use crate::config::WarehouseConfig;
use crate::domain::finding::Finding;
use crate::domain::inventory::InventoryRecord;
use crate::domain::report::{EvaluationReport, EvaluationSummary, RuleOutcome, RuleSummary};
use crate::domain::types::{RuleKind, RuleStatus};
use crate::engine::aggregator::FindingAggregator;
use crate::engine::capacity_tracker::CapacityTracker;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::location_classifier::LocationClassifier;
use crate::engine::lot_tracker::LotTracker;
use crate::engine::rules::{evaluator_for, EvaluationContext};
use crate::engine::snapshot::SnapshotValidator;
use crate::perf::PerfGuard;
use chrono::NaiveDateTime;
use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// RuleEngine - 规则引擎
// ==========================================
#[derive(Clone)]
pub struct RuleEngine {
    config: Arc<WarehouseConfig>,
    classifier: Arc<LocationClassifier>,
}

impl RuleEngine {
    /// 创建引擎（校验配置并编译库位模式）
    ///
    /// # 错误
    /// - Configuration / InvalidPattern / MissingCapacity: 配置非法，任何规则执行前返回
    pub fn new(config: WarehouseConfig) -> EngineResult<Self> {
        config.validate()?;
        let classifier = LocationClassifier::new(&config)?;
        info!(
            warehouse_id = %config.warehouse_id,
            special_locations = config.special_locations.len(),
            formats = config.location_formats.len(),
            patterns = config.location_patterns.len(),
            "规则引擎初始化完成"
        );
        Ok(Self {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
        })
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    pub fn classifier(&self) -> &LocationClassifier {
        &self.classifier
    }

    /// 评估库存快照
    ///
    /// # 参数
    /// - records: 库存记录（缺失必填字段的记录只告警不评估）
    /// - now: 本次评估的统一时间基准
    pub fn evaluate(&self, records: &[InventoryRecord], now: NaiveDateTime) -> EngineResult<EvaluationReport> {
        let perf = PerfGuard::new("rule_engine.evaluate");
        let run_id = Uuid::new_v4().to_string();

        info!(
            run_id = %run_id,
            warehouse_id = %self.config.warehouse_id,
            records = records.len(),
            now = %now,
            "开始评估库存快照"
        );

        // ==========================================
        // 步骤1: 快照校验
        // ==========================================
        let snapshot = SnapshotValidator::validate(records);
        let pallets = snapshot.records;

        // ==========================================
        // 步骤2: 库位占用与批次统计
        // ==========================================
        let capacity = CapacityTracker::build(&pallets, &self.classifier);
        let lots = LotTracker::build(&pallets, &self.classifier);
        debug!(
            distinct_locations = capacity.distinct_locations(),
            lots = lots.lot_count(),
            "库位与批次统计完成"
        );

        // ==========================================
        // 步骤3: 规则评估
        // ==========================================
        let ctx = EvaluationContext {
            records: &pallets,
            classifier: &self.classifier,
            capacity: &capacity,
            lots: &lots,
            config: &self.config,
            now,
        };
        let outcomes = if pallets.len() > self.config.parallel_threshold {
            self.run_parallel(&ctx)?
        } else {
            self.run_sequential(&ctx)
        };

        // ==========================================
        // 步骤4: 合并与汇总
        // ==========================================
        let rule_summaries: Vec<RuleSummary> = outcomes.iter().map(summarize_outcome).collect();
        let all_findings: Vec<Finding> = outcomes.into_iter().flat_map(|o| o.findings).collect();
        let total_findings = all_findings.len();
        let consolidated = FindingAggregator::consolidate(all_findings);

        let summary = EvaluationSummary {
            run_id,
            warehouse_id: self.config.warehouse_id.clone(),
            evaluated_at: now,
            total_records: records.len(),
            evaluated_records: pallets.len(),
            malformed_records: snapshot.warnings.len(),
            distinct_locations: capacity.distinct_locations(),
            records_by_location_type: capacity.records_by_type(),
            flagged_pallets: consolidated.len(),
            total_findings,
            rules: rule_summaries,
            elapsed_ms: perf.elapsed_ms(),
        };

        info!(
            run_id = %summary.run_id,
            records = summary.total_records,
            malformed = summary.malformed_records,
            findings = summary.total_findings,
            flagged_pallets = summary.flagged_pallets,
            elapsed_ms = summary.elapsed_ms,
            "库存快照评估完成"
        );

        Ok(EvaluationReport {
            summary,
            findings: consolidated,
            warnings: snapshot.warnings,
        })
    }

    /// 异步评估（CPU 密集部分放到 tokio 阻塞线程池）
    pub async fn evaluate_async(
        &self,
        records: Vec<InventoryRecord>,
        now: NaiveDateTime,
    ) -> EngineResult<EvaluationReport> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.evaluate(&records, now))
            .await
            .map_err(|e| EngineError::Worker(format!("评估任务异常终止: {}", e)))?
    }

    fn run_sequential(&self, ctx: &EvaluationContext<'_>) -> Vec<RuleOutcome> {
        RuleKind::ALL
            .iter()
            .map(|rule| self.run_rule(*rule, ctx))
            .collect()
    }

    fn run_parallel(&self, ctx: &EvaluationContext<'_>) -> EngineResult<Vec<RuleOutcome>> {
        debug!(records = ctx.records.len(), "规则并行执行");
        std::thread::scope(|scope| {
            let handles: Vec<_> = RuleKind::ALL
                .iter()
                .map(|rule| {
                    let rule = *rule;
                    (rule, scope.spawn(move || self.run_rule(rule, ctx)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(rule, handle)| {
                    handle.join().map_err(|payload| {
                        EngineError::Worker(format!("{} 规则线程 panic: {}", rule, panic_message(payload.as_ref())))
                    })
                })
                .collect()
        })
    }

    fn run_rule(&self, rule: RuleKind, ctx: &EvaluationContext<'_>) -> RuleOutcome {
        if !self.config.is_rule_enabled(rule) {
            debug!(rule = %rule, "规则已禁用");
            return RuleOutcome::disabled(rule);
        }
        let findings = evaluator_for(rule)(ctx);
        debug!(rule = %rule, findings = findings.len(), "规则执行完成");
        RuleOutcome {
            rule,
            status: RuleStatus::Executed,
            findings,
        }
    }
}

/// 便捷入口: 一次性构建引擎并评估
pub fn evaluate(
    records: &[InventoryRecord],
    config: WarehouseConfig,
    now: NaiveDateTime,
) -> EngineResult<EvaluationReport> {
    RuleEngine::new(config)?.evaluate(records, now)
}

fn summarize_outcome(outcome: &RuleOutcome) -> RuleSummary {
    let affected: HashSet<&str> = outcome.findings.iter().map(|f| f.pallet_id.as_str()).collect();
    RuleSummary {
        rule: outcome.rule,
        status: outcome.status,
        finding_count: outcome.findings.len(),
        affected_pallets: affected.len(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
