// ==========================================
// 仓储库存异常检测引擎 - 规则评估器
// ==========================================
// 职责: 八条相互独立的规则，统一签名 (context) → Vec<Finding>
// 红线: 规则之间不共享可变状态；同一规则内检出按输入顺序排列
// ==========================================

use crate::config::WarehouseConfig;
use crate::domain::finding::{Evidence, Finding};
use crate::domain::inventory::PalletRecord;
use crate::domain::location::LocationClassification;
use crate::domain::types::{LocationType, RuleKind};
use crate::engine::capacity_tracker::CapacityTracker;
use crate::engine::integrity_scanner::IntegrityScanner;
use crate::engine::location_classifier::LocationClassifier;
use crate::engine::lot_tracker::LotTracker;
use crate::engine::rule_core::RuleCore;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;

// ==========================================
// EvaluationContext - 单次评估的只读上下文
// ==========================================
pub struct EvaluationContext<'a> {
    pub records: &'a [PalletRecord],
    pub classifier: &'a LocationClassifier,
    pub capacity: &'a CapacityTracker,
    pub lots: &'a LotTracker,
    pub config: &'a WarehouseConfig,
    pub now: NaiveDateTime,
}

impl<'a> EvaluationContext<'a> {
    pub fn classify(&self, record: &PalletRecord) -> Arc<LocationClassification> {
        self.classifier.classify(&record.location)
    }

    /// 位于指定类型库位的记录
    fn records_in(&self, location_type: LocationType) -> impl Iterator<Item = &'a PalletRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| self.classify(r).location_type == location_type)
    }
}

/// 规则评估函数签名
pub type RuleEvaluator = fn(&EvaluationContext<'_>) -> Vec<Finding>;

/// 规则 → 评估函数
pub fn evaluator_for(rule: RuleKind) -> RuleEvaluator {
    match rule {
        RuleKind::DataIntegrity => evaluate_data_integrity,
        RuleKind::InvalidLocation => evaluate_invalid_location,
        RuleKind::Overcapacity => evaluate_overcapacity,
        RuleKind::ColdChain => evaluate_cold_chain,
        RuleKind::Stagnant => evaluate_stagnant,
        RuleKind::AisleStuck => evaluate_aisle_stuck,
        RuleKind::IncompleteLot => evaluate_incomplete_lot,
        RuleKind::LocationMapping => evaluate_location_mapping,
    }
}

// ==========================================
// DATA_INTEGRITY - 重复托盘号 + 未来时间
// ==========================================
pub fn evaluate_data_integrity(ctx: &EvaluationContext<'_>) -> Vec<Finding> {
    let mut duplicates: HashMap<usize, &[usize]> = HashMap::new();
    let groups = IntegrityScanner::find_duplicates(ctx.records);
    for group in &groups {
        for idx in &group.record_indices {
            duplicates.insert(*idx, &group.record_indices);
        }
    }
    let future: HashMap<usize, i64> = IntegrityScanner::find_future_dated(
        ctx.records,
        ctx.now,
        ctx.config.thresholds.future_tolerance_minutes,
    )
    .into_iter()
    .map(|f| (f.record_index, f.minutes_ahead))
    .collect();

    let mut findings = Vec::new();
    for (idx, record) in ctx.records.iter().enumerate() {
        if let Some(group) = duplicates.get(&idx) {
            let other_locations: Vec<String> = group
                .iter()
                .filter(|other| **other != idx)
                .map(|other| ctx.records[*other].location.clone())
                .collect();
            let reason = RuleCore::duplicate_reason(&record.pallet_id, group.len(), &other_locations);
            findings.push(Finding::new(
                RuleKind::DataIntegrity,
                record,
                Evidence::DuplicatePallet {
                    occurrences: group.len(),
                    other_locations,
                },
                reason,
            ));
        }
        if let Some(minutes_ahead) = future.get(&idx) {
            findings.push(Finding::new(
                RuleKind::DataIntegrity,
                record,
                Evidence::FutureTimestamp {
                    creation_timestamp: record.creation_timestamp,
                    minutes_ahead: *minutes_ahead,
                },
                RuleCore::future_reason(*minutes_ahead),
            ));
        }
    }
    findings
}

// ==========================================
// INVALID_LOCATION - 无法识别的库位
// ==========================================
pub fn evaluate_invalid_location(ctx: &EvaluationContext<'_>) -> Vec<Finding> {
    ctx.records_in(LocationType::Invalid)
        .map(|record| {
            Finding::new(
                RuleKind::InvalidLocation,
                record,
                Evidence::InvalidLocation {
                    raw_location: record.location.clone(),
                },
                RuleCore::invalid_location_reason(&record.location),
            )
        })
        .collect()
}

// ==========================================
// OVERCAPACITY - 超容库位上的全部托盘
// ==========================================
pub fn evaluate_overcapacity(ctx: &EvaluationContext<'_>) -> Vec<Finding> {
    ctx.records
        .iter()
        .filter_map(|record| {
            let occupancy = ctx.capacity.get(&record.location)?;
            if !occupancy.is_overcapacity() {
                return None;
            }
            Some(Finding::new(
                RuleKind::Overcapacity,
                record,
                Evidence::Overcapacity {
                    location_type: occupancy.classification.location_type,
                    occupant_count: occupancy.occupant_count(),
                    capacity: occupancy.capacity(),
                },
                RuleCore::overcapacity_reason(
                    &occupancy.location_key,
                    occupancy.occupant_count(),
                    occupancy.capacity(),
                ),
            ))
        })
        .collect()
}

// ==========================================
// COLD_CHAIN - 冷链品在存储位超时（分钟）
// ==========================================
pub fn evaluate_cold_chain(ctx: &EvaluationContext<'_>) -> Vec<Finding> {
    let classes = &ctx.config.cold_chain_classes;
    if classes.is_empty() {
        return Vec::new();
    }
    let default_minutes = ctx.config.thresholds.cold_chain_minutes;
    ctx.records_in(LocationType::Storage)
        .filter_map(|record| {
            let class = RuleCore::match_cold_chain_class(record.product.as_deref(), classes)?;
            let threshold_minutes = class.threshold_minutes.unwrap_or(default_minutes);
            if !RuleCore::exceeds_cold_chain(record.creation_timestamp, ctx.now, threshold_minutes) {
                return None;
            }
            let age_minutes = RuleCore::age_minutes(record.creation_timestamp, ctx.now);
            Some(Finding::new(
                RuleKind::ColdChain,
                record,
                Evidence::ColdChain {
                    product_class: class.name.clone(),
                    age_minutes,
                    threshold_minutes,
                },
                RuleCore::cold_chain_reason(&class.name, age_minutes, threshold_minutes),
            ))
        })
        .collect()
}

// ==========================================
// STAGNANT / AISLE_STUCK - 驻留超时
// ==========================================
fn evaluate_dwell(
    ctx: &EvaluationContext<'_>,
    rule: RuleKind,
    location_type: LocationType,
    threshold_hours: f64,
) -> Vec<Finding> {
    ctx.records_in(location_type)
        .filter(|record| RuleCore::exceeds_dwell(record.creation_timestamp, ctx.now, threshold_hours))
        .map(|record| {
            let age_hours = RuleCore::age_hours(record.creation_timestamp, ctx.now);
            Finding::new(
                rule,
                record,
                Evidence::Dwell {
                    location_type,
                    age_hours,
                    threshold_hours,
                },
                RuleCore::dwell_reason(location_type, age_hours, threshold_hours),
            )
        })
        .collect()
}

pub fn evaluate_stagnant(ctx: &EvaluationContext<'_>) -> Vec<Finding> {
    evaluate_dwell(
        ctx,
        RuleKind::Stagnant,
        LocationType::Receiving,
        ctx.config.thresholds.stagnation_hours,
    )
}

pub fn evaluate_aisle_stuck(ctx: &EvaluationContext<'_>) -> Vec<Finding> {
    evaluate_dwell(
        ctx,
        RuleKind::AisleStuck,
        LocationType::Aisle,
        ctx.config.thresholds.aisle_stuck_hours,
    )
}

// ==========================================
// INCOMPLETE_LOT - 批次已基本入库，收货区的掉队托盘
// ==========================================
pub fn evaluate_incomplete_lot(ctx: &EvaluationContext<'_>) -> Vec<Finding> {
    let threshold = ctx.config.thresholds.lot_completion_threshold;
    let mut flagged: Vec<(usize, Finding)> = Vec::new();
    for (receipt_number, progress) in ctx.lots.completed_lots(threshold) {
        for idx in &progress.receiving_indices {
            let record = &ctx.records[*idx];
            flagged.push((
                *idx,
                Finding::new(
                    RuleKind::IncompleteLot,
                    record,
                    Evidence::IncompleteLot {
                        receipt_number: receipt_number.to_string(),
                        stored_count: progress.stored,
                        total_count: progress.total,
                        stored_fraction: progress.stored_fraction(),
                        threshold,
                    },
                    RuleCore::incomplete_lot_reason(receipt_number, progress.stored, progress.total),
                ),
            ));
        }
    }
    flagged.sort_by_key(|(idx, _)| *idx);
    flagged.into_iter().map(|(_, f)| f).collect()
}

// ==========================================
// LOCATION_MAPPING - 声明类型与推导类型不一致
// ==========================================
pub fn evaluate_location_mapping(ctx: &EvaluationContext<'_>) -> Vec<Finding> {
    ctx.records_in(LocationType::Storage)
        .filter_map(|record| {
            let declared = record.declared_location_type?;
            if declared == LocationType::Storage {
                return None;
            }
            Some(Finding::new(
                RuleKind::LocationMapping,
                record,
                Evidence::LocationMismatch {
                    declared,
                    derived: LocationType::Storage,
                },
                RuleCore::mismatch_reason(declared, LocationType::Storage),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColdChainClass, LocationPattern, SpecialLocation};
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn record(id: &str, location: &str, created: NaiveDateTime) -> PalletRecord {
        PalletRecord {
            row_number: 0,
            pallet_id: id.to_string(),
            location: location.to_string(),
            creation_timestamp: created,
            receipt_number: None,
            product: None,
            declared_location_type: None,
        }
    }

    fn config() -> WarehouseConfig {
        let mut config = WarehouseConfig::new("WH-TEST");
        config.type_capacities.insert(LocationType::Storage, 1);
        config.type_capacities.insert(LocationType::Aisle, 2);
        config.special_locations = vec![SpecialLocation {
            code: "RECV-01".to_string(),
            location_type: LocationType::Receiving,
            capacity: Some(100),
            aliases: vec![],
        }];
        config.location_patterns = vec![
            LocationPattern {
                pattern: r"\d{3}[A-Z]".to_string(),
                location_type: LocationType::Storage,
                capacity: None,
                confidence: 0.9,
            },
            LocationPattern {
                pattern: r"AISLE-\d{2}".to_string(),
                location_type: LocationType::Aisle,
                capacity: None,
                confidence: 0.8,
            },
        ];
        config.cold_chain_classes = vec![ColdChainClass {
            name: "FROZEN".to_string(),
            keywords: vec!["frozen".to_string()],
            threshold_minutes: None,
        }];
        config
    }

    fn run(rule: RuleKind, records: &[PalletRecord], config: &WarehouseConfig, now: NaiveDateTime) -> Vec<Finding> {
        let classifier = LocationClassifier::new(config).unwrap();
        let capacity = CapacityTracker::build(records, &classifier);
        let lots = LotTracker::build(records, &classifier);
        let ctx = EvaluationContext {
            records,
            classifier: &classifier,
            capacity: &capacity,
            lots: &lots,
            config,
            now,
        };
        evaluator_for(rule)(&ctx)
    }

    #[test]
    fn test_duplicate_cites_other_locations() {
        let records = vec![
            record("DUP_001", "100A", ts(8, 0)),
            record("P2", "101A", ts(8, 0)),
            record("DUP_001", "RECV-01", ts(8, 0)),
        ];
        let findings = run(RuleKind::DataIntegrity, &records, &config(), ts(12, 0));
        assert_eq!(findings.len(), 2);
        assert_eq!(
            findings[0].evidence,
            Evidence::DuplicatePallet {
                occurrences: 2,
                other_locations: vec!["RECV-01".to_string()],
            }
        );
        assert_eq!(
            findings[1].evidence,
            Evidence::DuplicatePallet {
                occurrences: 2,
                other_locations: vec!["100A".to_string()],
            }
        );
    }

    #[test]
    fn test_duplicate_and_future_both_fire() {
        let records = vec![
            record("P1", "100A", ts(13, 0)),
            record("P1", "101A", ts(8, 0)),
        ];
        let findings = run(RuleKind::DataIntegrity, &records, &config(), ts(12, 0));
        assert_eq!(findings.len(), 3);
        assert!(matches!(
            findings[1].evidence,
            Evidence::FutureTimestamp { minutes_ahead: 60, .. }
        ));
    }

    #[test]
    fn test_overcapacity_flags_every_occupant() {
        let records = vec![
            record("P1", "200A", ts(8, 0)),
            record("P2", "200A", ts(8, 0)),
            record("P3", "200a", ts(8, 0)),
            record("P4", "201A", ts(8, 0)),
            record("P5", "BAD", ts(8, 0)),
            record("P6", "BAD", ts(8, 0)),
        ];
        let findings = run(RuleKind::Overcapacity, &records, &config(), ts(12, 0));
        let ids: Vec<&str> = findings.iter().map(|f| f.pallet_id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);
        assert_eq!(findings[2].location, "200a");
    }

    #[test]
    fn test_invalid_location() {
        let records = vec![record("P1", "200A", ts(8, 0)), record("P2", "??", ts(8, 0))];
        let findings = run(RuleKind::InvalidLocation, &records, &config(), ts(12, 0));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pallet_id, "P2");
    }

    #[test]
    fn test_stagnant_only_receiving() {
        let records = vec![
            record("P1", "RECV-01", ts(1, 0)),
            record("P2", "RECV-01", ts(11, 0)),
            record("P3", "200A", ts(1, 0)),
        ];
        let findings = run(RuleKind::Stagnant, &records, &config(), ts(13, 0));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pallet_id, "P1");
    }

    #[test]
    fn test_aisle_stuck() {
        let records = vec![record("P1", "AISLE-01", ts(7, 0)), record("P2", "AISLE-01", ts(10, 0))];
        let findings = run(RuleKind::AisleStuck, &records, &config(), ts(12, 0));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pallet_id, "P1");
    }

    #[test]
    fn test_cold_chain_minutes_with_override() {
        let mut records = vec![
            record("P1", "200A", ts(11, 0)),
            record("P2", "201A", ts(11, 45)),
            record("P3", "RECV-01", ts(8, 0)),
        ];
        for r in &mut records {
            r.product = Some("Frozen Fish".to_string());
        }
        let cfg = config();
        let findings = run(RuleKind::ColdChain, &records, &cfg, ts(12, 0));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pallet_id, "P1");

        let mut cfg = config();
        cfg.cold_chain_classes[0].threshold_minutes = Some(10);
        let findings = run(RuleKind::ColdChain, &records, &cfg, ts(12, 0));
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_incomplete_lot_threshold() {
        let mut records = vec![
            record("P1", "100A", ts(8, 0)),
            record("P2", "101A", ts(8, 0)),
            record("P3", "102A", ts(8, 0)),
            record("P4", "103A", ts(8, 0)),
            record("P5", "RECV-01", ts(8, 0)),
        ];
        for r in &mut records {
            r.receipt_number = Some("R1".to_string());
        }
        let findings = run(RuleKind::IncompleteLot, &records, &config(), ts(12, 0));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pallet_id, "P5");

        records[3].location = "RECV-01".to_string();
        let findings = run(RuleKind::IncompleteLot, &records, &config(), ts(12, 0));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_location_mapping_mismatch() {
        let mut records = vec![record("P1", "100A", ts(8, 0)), record("P2", "101A", ts(8, 0))];
        records[0].declared_location_type = Some(LocationType::Receiving);
        records[1].declared_location_type = Some(LocationType::Storage);
        let findings = run(RuleKind::LocationMapping, &records, &config(), ts(12, 0));
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].evidence,
            Evidence::LocationMismatch {
                declared: LocationType::Receiving,
                derived: LocationType::Storage,
            }
        );
    }
}
