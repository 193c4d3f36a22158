// ==========================================
// 仓储库存异常检测引擎 - 快照校验
// ==========================================
// 职责: InventoryRecord → PalletRecord，缺失必填字段的记录生成 RecordWarning
// 规则: 空白字符串视为缺失；托盘编号去除首尾空白；每条问题记录只告警一次
// ==========================================

use crate::domain::inventory::{InventoryRecord, PalletRecord, RecordWarning};
use tracing::warn;

/// 校验结果
#[derive(Debug, Clone, Default)]
pub struct ValidatedSnapshot {
    pub records: Vec<PalletRecord>,
    pub warnings: Vec<RecordWarning>,
}

pub struct SnapshotValidator;

impl SnapshotValidator {
    pub fn validate(records: &[InventoryRecord]) -> ValidatedSnapshot {
        let mut snapshot = ValidatedSnapshot {
            records: Vec::with_capacity(records.len()),
            warnings: Vec::new(),
        };

        for record in records {
            match Self::validate_record(record) {
                Ok(pallet) => snapshot.records.push(pallet),
                Err(warning) => {
                    warn!(
                        row_number = warning.row_number,
                        pallet_id = ?warning.pallet_id,
                        field = %warning.field,
                        "记录缺失必填字段，已跳过"
                    );
                    snapshot.warnings.push(warning);
                }
            }
        }

        snapshot
    }

    /// 校验单条记录
    pub fn validate_record(record: &InventoryRecord) -> Result<PalletRecord, RecordWarning> {
        let pallet_id = non_blank(record.pallet_id.as_deref());
        let location = non_blank(record.location.as_deref());

        let mut missing = Vec::new();
        if pallet_id.is_none() {
            missing.push("pallet_id");
        }
        if location.is_none() {
            missing.push("location");
        }
        if record.creation_timestamp.is_none() {
            missing.push("creation_timestamp");
        }

        match (pallet_id, location, record.creation_timestamp) {
            (Some(pallet_id), Some(location), Some(creation_timestamp)) => Ok(PalletRecord {
                row_number: record.row_number,
                pallet_id: pallet_id.trim().to_string(),
                location: location.to_string(),
                creation_timestamp,
                receipt_number: record.receipt_number.clone(),
                product: record.product.clone(),
                declared_location_type: record.location_type,
            }),
            _ => Err(RecordWarning {
                row_number: record.row_number,
                pallet_id: pallet_id.map(str::to_string),
                field: missing.join(","),
                message: format!("缺失必填字段: {}", missing.join(", ")),
            }),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn full(row: usize) -> InventoryRecord {
        InventoryRecord {
            row_number: row,
            pallet_id: Some(format!("P{}", row)),
            location: Some("100A".to_string()),
            creation_timestamp: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_records_pass_through() {
        let snapshot = SnapshotValidator::validate(&[full(1), full(2)]);
        assert_eq!(snapshot.records.len(), 2);
        assert!(snapshot.warnings.is_empty());
        assert_eq!(snapshot.records[1].pallet_id, "P2");
        assert_eq!(snapshot.records[1].row_number, 2);
    }

    #[test]
    fn test_missing_fields_reported_once() {
        let mut a = full(1);
        a.location = Some("   ".to_string());
        a.creation_timestamp = None;
        let mut b = full(2);
        b.pallet_id = None;

        let snapshot = SnapshotValidator::validate(&[a, b, full(3)]);
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.warnings.len(), 2);
        assert_eq!(snapshot.warnings[0].field, "location,creation_timestamp");
        assert_eq!(snapshot.warnings[0].pallet_id.as_deref(), Some("P1"));
        assert_eq!(snapshot.warnings[1].field, "pallet_id");
        assert_eq!(snapshot.warnings[1].pallet_id, None);
    }

    #[test]
    fn test_pallet_id_trimmed() {
        let mut padded = full(1);
        padded.pallet_id = Some(" DUP_001 ".to_string());
        let snapshot = SnapshotValidator::validate(&[padded]);
        assert_eq!(snapshot.records[0].pallet_id, "DUP_001");
    }
}
