// ==========================================
// 仓储库存异常检测引擎 - 库位占用统计
// ==========================================
// 职责: 归一化库位 → 占用托盘列表，并携带分类结果（有效容量）
// 红线: INVALID 库位不参与超容判定
// ==========================================

use crate::domain::inventory::PalletRecord;
use crate::domain::location::LocationClassification;
use crate::domain::types::LocationType;
use crate::engine::location_classifier::{normalize_location, LocationClassifier};
use std::collections::BTreeMap;
use std::sync::Arc;

// ==========================================
// LocationOccupancy - 单库位占用
// ==========================================
#[derive(Debug, Clone)]
pub struct LocationOccupancy {
    pub location_key: String,
    pub classification: Arc<LocationClassification>,
    pub record_indices: Vec<usize>, // 指向评估记录切片的下标（按输入顺序）
}

impl LocationOccupancy {
    pub fn occupant_count(&self) -> usize {
        self.record_indices.len()
    }

    pub fn capacity(&self) -> u32 {
        self.classification.capacity
    }

    /// 是否超容（INVALID 库位永不超容）
    pub fn is_overcapacity(&self) -> bool {
        !self.classification.is_invalid() && self.occupant_count() > self.capacity() as usize
    }
}

// ==========================================
// CapacityTracker - 库位占用统计
// ==========================================
#[derive(Debug, Default)]
pub struct CapacityTracker {
    occupancy: BTreeMap<String, LocationOccupancy>,
}

impl CapacityTracker {
    /// 统计全部记录的库位占用
    pub fn build(records: &[PalletRecord], classifier: &LocationClassifier) -> Self {
        let mut occupancy: BTreeMap<String, LocationOccupancy> = BTreeMap::new();
        for (idx, record) in records.iter().enumerate() {
            let key = normalize_location(&record.location);
            occupancy
                .entry(key)
                .or_insert_with_key(|key| LocationOccupancy {
                    location_key: key.clone(),
                    classification: classifier.classify(&record.location),
                    record_indices: Vec::new(),
                })
                .record_indices
                .push(idx);
        }
        Self { occupancy }
    }

    pub fn get(&self, raw_location: &str) -> Option<&LocationOccupancy> {
        self.occupancy.get(&normalize_location(raw_location))
    }

    /// 不同库位数
    pub fn distinct_locations(&self) -> usize {
        self.occupancy.len()
    }

    /// 超容库位（按库位键升序）
    pub fn overcapacity_locations(&self) -> impl Iterator<Item = &LocationOccupancy> {
        self.occupancy.values().filter(|o| o.is_overcapacity())
    }

    /// 按库位类型统计记录数
    pub fn records_by_type(&self) -> BTreeMap<LocationType, usize> {
        let mut counts = BTreeMap::new();
        for occ in self.occupancy.values() {
            *counts.entry(occ.classification.location_type).or_insert(0) += occ.occupant_count();
        }
        counts
    }
}
