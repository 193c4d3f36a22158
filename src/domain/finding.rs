// ==========================================
// 仓储库存异常检测引擎 - 异常发现领域模型
// ==========================================
// Finding: 单条规则对单个托盘的一次检出
// ConsolidatedFinding: 同一托盘的全部检出合并结果
// 红线: 合并不丢失任何规则的检出与证据
// ==========================================

use crate::domain::inventory::PalletRecord;
use crate::domain::types::{LocationType, Priority, RuleKind};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Evidence - 规则证据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Evidence {
    /// 同一托盘号出现多次
    DuplicatePallet {
        occurrences: usize,
        other_locations: Vec<String>,
    },
    /// 创建时间晚于评估时间
    FutureTimestamp {
        creation_timestamp: NaiveDateTime,
        minutes_ahead: i64,
    },
    /// 库位无法识别
    InvalidLocation { raw_location: String },
    /// 库位超容
    Overcapacity {
        location_type: LocationType,
        occupant_count: usize,
        capacity: u32,
    },
    /// 冷链品在常温存储位超时
    ColdChain {
        product_class: String,
        age_minutes: i64,
        threshold_minutes: i64,
    },
    /// 收货区/通道驻留超时
    Dwell {
        location_type: LocationType,
        age_hours: f64,
        threshold_hours: f64,
    },
    /// 批次已基本入库，托盘仍在收货区
    IncompleteLot {
        receipt_number: String,
        stored_count: usize,
        total_count: usize,
        stored_fraction: f64,
        threshold: f64,
    },
    /// 外部声明类型与推导类型不一致
    LocationMismatch {
        declared: LocationType,
        derived: LocationType,
    },
}

// ==========================================
// Finding - 单条检出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub pallet_id: String,
    pub rule: RuleKind,
    pub priority: Priority,
    pub location: String,     // 原始库位（输入中存在）
    pub row_number: usize,
    pub evidence: Evidence,
    pub reason: String,       // 可解释原因
}

impl Finding {
    pub fn new(rule: RuleKind, record: &PalletRecord, evidence: Evidence, reason: String) -> Self {
        Self {
            pallet_id: record.pallet_id.clone(),
            rule,
            priority: rule.priority(),
            location: record.location.clone(),
            row_number: record.row_number,
            evidence,
            reason,
        }
    }
}

// ==========================================
// ConsolidatedFinding - 托盘级合并结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedFinding {
    pub pallet_id: String,
    pub rules: Vec<RuleKind>,   // 去重，按严重度降序
    pub priority: Priority,     // 成员中最高优先级
    pub locations: Vec<String>, // 去重，保持首次出现顺序
    pub findings: Vec<Finding>,
}

impl ConsolidatedFinding {
    /// 最严重的规则
    pub fn top_rule(&self) -> Option<RuleKind> {
        self.rules.first().copied()
    }

    pub fn has_rule(&self, rule: RuleKind) -> bool {
        self.rules.contains(&rule)
    }

    pub fn findings_for(&self, rule: RuleKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.rule == rule)
    }
}
