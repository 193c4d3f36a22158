// ==========================================
// 仓储库存异常检测引擎 - 领域类型定义
// ==========================================
// 库位类型 / 规则类型 / 优先级 / 规则执行状态 / 匹配层级
// 红线: 规则集合封闭，枚举声明顺序即严重度顺序
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 库位类型 (Location Type)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与外部配置一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Receiving, // 收货区
    Storage,   // 存储位
    Aisle,     // 通道
    Staging,   // 暂存区
    Dock,      // 月台
    Invalid,   // 无法识别
}

impl LocationType {
    pub const ALL: [LocationType; 6] = [
        LocationType::Receiving,
        LocationType::Storage,
        LocationType::Aisle,
        LocationType::Staging,
        LocationType::Dock,
        LocationType::Invalid,
    ];

    /// 转换为外部存储的字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Receiving => "RECEIVING",
            LocationType::Storage => "STORAGE",
            LocationType::Aisle => "AISLE",
            LocationType::Staging => "STAGING",
            LocationType::Dock => "DOCK",
            LocationType::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RECEIVING" => Ok(LocationType::Receiving),
            "STORAGE" => Ok(LocationType::Storage),
            "AISLE" => Ok(LocationType::Aisle),
            "STAGING" => Ok(LocationType::Staging),
            "DOCK" => Ok(LocationType::Dock),
            "INVALID" => Ok(LocationType::Invalid),
            other => Err(format!("未知库位类型: {}", other)),
        }
    }
}

// ==========================================
// 规则类型 (Rule Kind)
// ==========================================
// 声明顺序 = 严重度从高到低，聚合排序依赖此顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    DataIntegrity,   // 数据完整性（重复托盘/未来时间）
    InvalidLocation, // 无效库位
    Overcapacity,    // 超容
    ColdChain,       // 冷链超时
    Stagnant,        // 收货区滞留
    AisleStuck,      // 通道滞留
    IncompleteLot,   // 批次尾货
    LocationMapping, // 库位类型不一致
}

impl RuleKind {
    /// 全部规则（按严重度降序）
    pub const ALL: [RuleKind; 8] = [
        RuleKind::DataIntegrity,
        RuleKind::InvalidLocation,
        RuleKind::Overcapacity,
        RuleKind::ColdChain,
        RuleKind::Stagnant,
        RuleKind::AisleStuck,
        RuleKind::IncompleteLot,
        RuleKind::LocationMapping,
    ];

    /// 严重度排名（0 最高）
    pub fn severity_rank(&self) -> usize {
        *self as usize
    }

    /// 规则默认优先级
    pub fn priority(&self) -> Priority {
        match self {
            RuleKind::DataIntegrity | RuleKind::InvalidLocation => Priority::VeryHigh,
            RuleKind::Overcapacity | RuleKind::ColdChain => Priority::High,
            RuleKind::Stagnant | RuleKind::AisleStuck | RuleKind::IncompleteLot => {
                Priority::Medium
            }
            RuleKind::LocationMapping => Priority::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::DataIntegrity => "DATA_INTEGRITY",
            RuleKind::InvalidLocation => "INVALID_LOCATION",
            RuleKind::Overcapacity => "OVERCAPACITY",
            RuleKind::ColdChain => "COLD_CHAIN",
            RuleKind::Stagnant => "STAGNANT",
            RuleKind::AisleStuck => "AISLE_STUCK",
            RuleKind::IncompleteLot => "INCOMPLETE_LOT",
            RuleKind::LocationMapping => "LOCATION_MAPPING",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_uppercase();
        RuleKind::ALL
            .iter()
            .copied()
            .find(|rule| rule.as_str() == key)
            .ok_or_else(|| format!("未知规则: {}", s))
    }
}

// ==========================================
// 优先级 (Priority)
// ==========================================
// 顺序: Low < Medium < High < VeryHigh
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "LOW"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::High => write!(f, "HIGH"),
            Priority::VeryHigh => write!(f, "VERY_HIGH"),
        }
    }
}

// ==========================================
// 规则执行状态 (Rule Status)
// ==========================================
// 被禁用的规则也必须出现在汇总中，不能静默跳过
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    Executed,
    Disabled,
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleStatus::Executed => write!(f, "EXECUTED"),
            RuleStatus::Disabled => write!(f, "DISABLED"),
        }
    }
}

// ==========================================
// 库位匹配层级 (Match Tier)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchTier {
    Special,   // 特殊库位精确匹配
    Format,    // 库位格式描述符匹配
    Pattern,   // 正则模式匹配
    Unmatched, // 未匹配 → INVALID
}
