// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};
use warehouse_anomaly::domain::inventory::InventoryRecord;
use warehouse_anomaly::domain::types::LocationType;

/// 固定评估时间: 2025-03-01 12:00:00
pub fn eval_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

// ==========================================
// InventoryRecord 构建器
// ==========================================

pub struct RecordBuilder {
    row_number: usize,
    pallet_id: Option<String>,
    location: Option<String>,
    creation_timestamp: Option<NaiveDateTime>,
    receipt_number: Option<String>,
    product: Option<String>,
    location_type: Option<LocationType>,
}

impl RecordBuilder {
    /// 默认: 1 小时前创建，位于 100A
    pub fn new(pallet_id: &str) -> Self {
        Self {
            row_number: 0,
            pallet_id: Some(pallet_id.to_string()),
            location: Some("100A".to_string()),
            creation_timestamp: Some(eval_now() - Duration::hours(1)),
            receipt_number: None,
            product: None,
            location_type: None,
        }
    }

    pub fn row(mut self, row_number: usize) -> Self {
        self.row_number = row_number;
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn created(mut self, ts: NaiveDateTime) -> Self {
        self.creation_timestamp = Some(ts);
        self
    }

    /// 相对 eval_now() 的驻留小时数
    pub fn aged_hours(self, hours: i64) -> Self {
        self.created(eval_now() - Duration::hours(hours))
    }

    /// 相对 eval_now() 的驻留分钟数
    pub fn aged_minutes(self, minutes: i64) -> Self {
        self.created(eval_now() - Duration::minutes(minutes))
    }

    pub fn lot(mut self, receipt_number: &str) -> Self {
        self.receipt_number = Some(receipt_number.to_string());
        self
    }

    pub fn product(mut self, product: &str) -> Self {
        self.product = Some(product.to_string());
        self
    }

    pub fn declared(mut self, location_type: LocationType) -> Self {
        self.location_type = Some(location_type);
        self
    }

    pub fn without_pallet_id(mut self) -> Self {
        self.pallet_id = None;
        self
    }

    pub fn without_location(mut self) -> Self {
        self.location = None;
        self
    }

    pub fn without_timestamp(mut self) -> Self {
        self.creation_timestamp = None;
        self
    }

    pub fn build(self) -> InventoryRecord {
        InventoryRecord {
            row_number: self.row_number,
            pallet_id: self.pallet_id,
            location: self.location,
            creation_timestamp: self.creation_timestamp,
            receipt_number: self.receipt_number,
            product: self.product,
            location_type: self.location_type,
        }
    }
}

// ==========================================
// 批量数据
// ==========================================

/// 生成 count 条互不冲突的正常记录（各占一个存储位 {i}Z，驻留 1 小时）
pub fn filler_records(prefix: &str, count: usize) -> Vec<InventoryRecord> {
    (0..count)
        .map(|i| {
            RecordBuilder::new(&format!("{}{:04}", prefix, i))
                .location(&format!("{}Z", i))
                .build()
        })
        .collect()
}

/// 按输入顺序重写行号（从 1 开始）
pub fn numbered(mut records: Vec<InventoryRecord>) -> Vec<InventoryRecord> {
    for (i, record) in records.iter_mut().enumerate() {
        record.row_number = i + 1;
    }
    records
}
