// ==========================================
// 仓储库存异常检测引擎 - Rule Core 纯函数库
// ==========================================
// 职责: 驻留时长、冷链品类、阈值判定与原因文本
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::config::ColdChainClass;
use crate::domain::types::LocationType;
use chrono::{Duration, NaiveDateTime};

// ==========================================
// RuleCore - 纯函数工具类
// ==========================================
pub struct RuleCore;

impl RuleCore {
    /// 驻留小时数（未来时间为负）
    pub fn age_hours(created: NaiveDateTime, now: NaiveDateTime) -> f64 {
        now.signed_duration_since(created).num_seconds() as f64 / 3600.0
    }

    /// 驻留分钟数（向下取整）
    pub fn age_minutes(created: NaiveDateTime, now: NaiveDateTime) -> i64 {
        now.signed_duration_since(created).num_minutes()
    }

    /// 是否驻留超时（严格大于阈值）
    ///
    /// # 规则
    /// - age > threshold_hours → true
    /// - 未来时间（age < 0）永不超时
    pub fn exceeds_dwell(created: NaiveDateTime, now: NaiveDateTime, threshold_hours: f64) -> bool {
        let age = now.signed_duration_since(created);
        if age <= Duration::zero() {
            return false;
        }
        age.num_milliseconds() as f64 > threshold_hours * 3_600_000.0
    }

    /// 冷链是否超时（严格大于阈值，单位分钟）
    pub fn exceeds_cold_chain(created: NaiveDateTime, now: NaiveDateTime, threshold_minutes: i64) -> bool {
        // 超出可表示范围的阈值视为永不超限
        Duration::try_minutes(threshold_minutes)
            .map_or(false, |limit| now.signed_duration_since(created) > limit)
    }

    /// 匹配冷链品类（品名包含关键字，不区分大小写；按配置顺序取第一个）
    pub fn match_cold_chain_class<'a>(
        product: Option<&str>,
        classes: &'a [ColdChainClass],
    ) -> Option<&'a ColdChainClass> {
        let product = product?.trim().to_lowercase();
        if product.is_empty() {
            return None;
        }
        classes.iter().find(|class| {
            class
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .any(|k| !k.is_empty() && product.contains(&k))
        })
    }

    // ==========================================
    // 原因文本
    // ==========================================

    pub fn dwell_reason(location_type: LocationType, age_hours: f64, threshold_hours: f64) -> String {
        format!(
            "{}库位驻留 {:.1} 小时，超过阈值 {:.1} 小时",
            location_type, age_hours, threshold_hours
        )
    }

    pub fn overcapacity_reason(location: &str, occupant_count: usize, capacity: u32) -> String {
        format!(
            "库位 {} 存放 {} 个托盘，超过容量 {}",
            location, occupant_count, capacity
        )
    }

    pub fn cold_chain_reason(class_name: &str, age_minutes: i64, threshold_minutes: i64) -> String {
        format!(
            "冷链品类 {} 在存储位停留 {} 分钟，超过阈值 {} 分钟",
            class_name, age_minutes, threshold_minutes
        )
    }

    pub fn incomplete_lot_reason(receipt_number: &str, stored: usize, total: usize) -> String {
        format!(
            "批次 {} 已入库 {}/{}，该托盘仍在收货区",
            receipt_number, stored, total
        )
    }

    pub fn duplicate_reason(pallet_id: &str, occurrences: usize, other_locations: &[String]) -> String {
        format!(
            "托盘号 {} 出现 {} 次，其他库位: {}",
            pallet_id,
            occurrences,
            other_locations.join(", ")
        )
    }

    pub fn future_reason(minutes_ahead: i64) -> String {
        format!("创建时间晚于评估时间 {} 分钟", minutes_ahead)
    }

    pub fn invalid_location_reason(raw_location: &str) -> String {
        format!("库位 '{}' 无法识别", raw_location)
    }

    pub fn mismatch_reason(declared: LocationType, derived: LocationType) -> String {
        format!("声明库位类型 {} 与推导类型 {} 不一致", declared, derived)
    }
}
