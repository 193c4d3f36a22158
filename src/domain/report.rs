// ==========================================
// 仓储库存异常检测引擎 - 评估报告
// ==========================================
// 输出: 有序的托盘级结果 + 按规则汇总计数 + 记录级告警
// 汇总计数供外部报表层渲染驾驶舱
// ==========================================

use crate::domain::finding::{ConsolidatedFinding, Finding};
use crate::domain::inventory::RecordWarning;
use crate::domain::types::{LocationType, RuleKind, RuleStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// RuleOutcome - 单条规则的执行结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: RuleKind,
    pub status: RuleStatus,
    pub findings: Vec<Finding>,
}

impl RuleOutcome {
    pub fn disabled(rule: RuleKind) -> Self {
        Self {
            rule,
            status: RuleStatus::Disabled,
            findings: Vec::new(),
        }
    }
}

// ==========================================
// RuleSummary - 单条规则汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub rule: RuleKind,
    pub status: RuleStatus,
    pub finding_count: usize,
    pub affected_pallets: usize,
}

// ==========================================
// EvaluationSummary - 运行级汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub run_id: String,
    pub warehouse_id: String,
    pub evaluated_at: NaiveDateTime, // 本次评估的 now
    pub total_records: usize,
    pub evaluated_records: usize,
    pub malformed_records: usize,
    pub distinct_locations: usize,
    pub records_by_location_type: BTreeMap<LocationType, usize>,
    pub flagged_pallets: usize,
    pub total_findings: usize,
    pub rules: Vec<RuleSummary>,
    pub elapsed_ms: u64,
}

impl EvaluationSummary {
    /// 某条规则的检出数
    pub fn count_for(&self, rule: RuleKind) -> usize {
        self.rules
            .iter()
            .find(|s| s.rule == rule)
            .map(|s| s.finding_count)
            .unwrap_or(0)
    }

    pub fn status_for(&self, rule: RuleKind) -> Option<RuleStatus> {
        self.rules.iter().find(|s| s.rule == rule).map(|s| s.status)
    }
}

// ==========================================
// EvaluationReport - 评估报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub summary: EvaluationSummary,
    pub findings: Vec<ConsolidatedFinding>,
    pub warnings: Vec<RecordWarning>,
}

impl EvaluationReport {
    /// 某条规则的全部检出（按结果顺序展开）
    pub fn findings_for_rule(&self, rule: RuleKind) -> Vec<&Finding> {
        self.findings
            .iter()
            .flat_map(|c| c.findings.iter())
            .filter(|f| f.rule == rule)
            .collect()
    }

    pub fn pallet(&self, pallet_id: &str) -> Option<&ConsolidatedFinding> {
        self.findings.iter().find(|c| c.pallet_id == pallet_id)
    }
}
