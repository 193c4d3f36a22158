// ==========================================
// 仓储库存异常检测引擎 - 数据完整性扫描
// ==========================================
// 职责: 检测同一快照内重复托盘号、创建时间在未来的记录
// 说明: 两项检测相互独立，同一托盘可同时命中
// ==========================================

use crate::domain::inventory::PalletRecord;
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;

/// 重复托盘号分组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub pallet_id: String,
    pub record_indices: Vec<usize>, // 全部出现位置（按输入顺序）
}

/// 未来时间记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FutureDated {
    pub record_index: usize,
    pub minutes_ahead: i64,
}

pub struct IntegrityScanner;

impl IntegrityScanner {
    /// 检测重复托盘号
    ///
    /// # 返回
    /// - 出现 >= 2 次的托盘号分组（按托盘号升序），包含首次出现
    pub fn find_duplicates(records: &[PalletRecord]) -> Vec<DuplicateGroup> {
        let mut occurrences: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, record) in records.iter().enumerate() {
            occurrences
                .entry(record.pallet_id.trim())
                .or_default()
                .push(idx);
        }

        occurrences
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(pallet_id, record_indices)| DuplicateGroup {
                pallet_id: pallet_id.to_string(),
                record_indices,
            })
            .collect()
    }

    /// 检测创建时间晚于 now + tolerance 的记录
    pub fn find_future_dated(
        records: &[PalletRecord],
        now: NaiveDateTime,
        tolerance_minutes: i64,
    ) -> Vec<FutureDated> {
        let Some(limit) = Duration::try_minutes(tolerance_minutes)
            .and_then(|tolerance| now.checked_add_signed(tolerance))
        else {
            return Vec::new();
        };
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.creation_timestamp > limit)
            .map(|(record_index, r)| FutureDated {
                record_index,
                minutes_ahead: r.creation_timestamp.signed_duration_since(now).num_minutes(),
            })
            .collect()
    }
}
