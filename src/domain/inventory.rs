// ==========================================
// 仓储库存异常检测引擎 - 库存记录领域模型
// ==========================================
// 输入: 外部导入层已解析的规范化记录（不解析表格）
// 红线: 记录在一次评估内不可变
// ==========================================

use crate::domain::types::LocationType;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryRecord - 库存快照输入记录
// ==========================================
// 必填字段 (pallet_id / location / creation_timestamp) 用 Option 表示，
// 以便识别并上报缺失字段的记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(default)]
    pub row_number: usize, // 原始行号（用于告警定位）

    pub pallet_id: Option<String>,                  // 托盘号（不保证唯一）
    pub location: Option<String>,                   // 原始库位字符串
    pub creation_timestamp: Option<NaiveDateTime>,  // 创建时间

    #[serde(default)]
    pub receipt_number: Option<String>, // 收货单/批次号
    #[serde(default)]
    pub product: Option<String>, // 品名（可能含冷链品类）
    #[serde(default)]
    pub location_type: Option<LocationType>, // 外部声明的库位类型（可选）
}

// ==========================================
// PalletRecord - 校验通过的托盘记录
// ==========================================
// 用途: 规则引擎唯一输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalletRecord {
    pub row_number: usize,
    pub pallet_id: String,
    pub location: String,
    pub creation_timestamp: NaiveDateTime,
    pub receipt_number: Option<String>,
    pub product: Option<String>,
    pub declared_location_type: Option<LocationType>,
}

impl PalletRecord {
    /// 计算驻留时长（now - creation_timestamp，未来时间为负）
    pub fn age(&self, now: NaiveDateTime) -> Duration {
        now.signed_duration_since(self.creation_timestamp)
    }

    /// 批次号（空白视为无批次）
    pub fn lot_id(&self) -> Option<&str> {
        self.receipt_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// ==========================================
// RecordWarning - 记录级告警
// ==========================================
// 缺失必填字段的记录不参与规则评估，但必须上报一次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordWarning {
    pub row_number: usize,
    pub pallet_id: Option<String>,
    pub field: String,   // 缺失字段（多个以逗号分隔）
    pub message: String,
}
