// ==========================================
// 仓储库存异常检测引擎 - 检出合并器
// ==========================================
// 职责: 按托盘号合并全部规则检出，计算优先级并排序
// 排序: 最严重规则降序 → 托盘号升序
// 红线: 合并不丢弃任何检出或证据
// ==========================================

use crate::domain::finding::{ConsolidatedFinding, Finding};
use crate::domain::types::{Priority, RuleKind};
use std::collections::BTreeMap;

pub struct FindingAggregator;

impl FindingAggregator {
    /// 合并检出
    ///
    /// # 参数
    /// - findings: 各规则检出（按规则严重度、再按输入顺序拼接）
    ///
    /// # 返回
    /// - 每个托盘一条 ConsolidatedFinding
    pub fn consolidate(findings: Vec<Finding>) -> Vec<ConsolidatedFinding> {
        let mut grouped: BTreeMap<String, Vec<Finding>> = BTreeMap::new();
        for finding in findings {
            grouped.entry(finding.pallet_id.clone()).or_default().push(finding);
        }

        let mut consolidated: Vec<ConsolidatedFinding> = grouped
            .into_iter()
            .map(|(pallet_id, mut findings)| {
                // 稳定排序: 同一规则内保持输入顺序
                findings.sort_by_key(|f| f.rule.severity_rank());

                let mut rules: Vec<RuleKind> = findings.iter().map(|f| f.rule).collect();
                rules.dedup();

                let priority = findings
                    .iter()
                    .map(|f| f.priority)
                    .max()
                    .unwrap_or(Priority::Low);

                let mut locations: Vec<String> = Vec::new();
                for f in &findings {
                    if !locations.contains(&f.location) {
                        locations.push(f.location.clone());
                    }
                }

                ConsolidatedFinding {
                    pallet_id,
                    rules,
                    priority,
                    locations,
                    findings,
                }
            })
            .collect();

        // BTreeMap 已按托盘号升序，稳定排序后同级保持该顺序
        consolidated.sort_by_key(|c| c.top_rule().map_or(usize::MAX, |r| r.severity_rank()));
        consolidated
    }
}
