// ==========================================
// 仓储库存异常检测引擎 - 批次入库进度统计
// ==========================================
// 职责: 按收货单号分组，计算已入库比例 stored / total
// 规则: 无批次号的记录不分组；已入库数为 0 的批次永不触发
// ==========================================

use crate::domain::inventory::PalletRecord;
use crate::domain::types::LocationType;
use crate::engine::location_classifier::LocationClassifier;
use std::collections::BTreeMap;

// 比例比较容差（0.8 这类阈值无法精确表示）
const FRACTION_EPSILON: f64 = 1e-9;

// ==========================================
// LotProgress - 单批次进度
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LotProgress {
    pub total: usize,
    pub stored: usize,
    pub receiving_indices: Vec<usize>, // 仍在收货区的记录下标
}

impl LotProgress {
    pub fn stored_fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.stored as f64 / self.total as f64
    }

    /// 是否达到完成阈值（stored_fraction >= threshold）
    pub fn reaches(&self, threshold: f64) -> bool {
        self.stored > 0 && self.stored_fraction() + FRACTION_EPSILON >= threshold
    }
}

// ==========================================
// LotTracker - 批次统计
// ==========================================
#[derive(Debug, Default)]
pub struct LotTracker {
    lots: BTreeMap<String, LotProgress>,
}

impl LotTracker {
    pub fn build(records: &[PalletRecord], classifier: &LocationClassifier) -> Self {
        let mut lots: BTreeMap<String, LotProgress> = BTreeMap::new();
        for (idx, record) in records.iter().enumerate() {
            let Some(lot_id) = record.lot_id() else {
                continue;
            };
            let progress = lots.entry(lot_id.to_string()).or_default();
            progress.total += 1;
            match classifier.classify(&record.location).location_type {
                LocationType::Storage => progress.stored += 1,
                LocationType::Receiving => progress.receiving_indices.push(idx),
                _ => {}
            }
        }
        Self { lots }
    }

    pub fn lot_count(&self) -> usize {
        self.lots.len()
    }

    /// 达到完成阈值的批次（按批次号升序）
    pub fn completed_lots(&self, threshold: f64) -> impl Iterator<Item = (&str, &LotProgress)> {
        self.lots
            .iter()
            .filter(move |(_, p)| p.reaches(threshold))
            .map(|(k, p)| (k.as_str(), p))
    }
}
