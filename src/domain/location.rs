// ==========================================
// 仓储库存异常检测引擎 - 库位分类结果
// ==========================================
// 红线: 分类结果是 (原始库位, 配置) 的纯函数，创建后不可变
// ==========================================

use crate::domain::types::{LocationType, MatchTier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationClassification {
    pub raw_location: String,
    pub location_type: LocationType,
    pub capacity: u32,            // 0 = 结构上不可存放
    pub is_special: bool,         // 是否特殊库位（收货/通道/月台等）
    pub confidence: f64,          // 0.0 - 1.0
    pub matched_by: MatchTier,
    pub format_version: Option<u32>, // 命中的格式描述符版本
}

impl LocationClassification {
    /// 无法识别的库位
    pub fn invalid(raw_location: &str) -> Self {
        Self {
            raw_location: raw_location.to_string(),
            location_type: LocationType::Invalid,
            capacity: 0,
            is_special: false,
            confidence: 0.0,
            matched_by: MatchTier::Unmatched,
            format_version: None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.location_type == LocationType::Invalid
    }
}
