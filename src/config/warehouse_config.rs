// ==========================================
// 仓储库存异常检测引擎 - 仓库配置
// ==========================================
// 职责: 库位命名格式、容量表、规则阈值、冷链品类映射
// 来源: 外部配置管理层提供，引擎只读
// 红线: 引擎不为从未提供的容量/阈值兜底，缺失即配置错误
// ==========================================

use crate::domain::types::{LocationType, RuleKind};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ==========================================
// SpecialLocation - 特殊库位（精确匹配）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialLocation {
    pub code: String,
    pub location_type: LocationType,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

// ==========================================
// LocationFormat - 库位格式描述符（版本化，学习所得）
// ==========================================
// 例: 位号最多3位数字 + 1位字母层级 → "200A"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFormat {
    pub version: u32,
    #[serde(default = "default_format_type")]
    pub location_type: LocationType,
    pub segments: Vec<FormatSegment>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default = "default_format_confidence")]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormatSegment {
    Digits { min: usize, max: usize },
    Letters { min: usize, max: usize },
    Literal { value: String },
}

impl LocationFormat {
    /// 生成全匹配正则（输入已统一转为大写）
    pub fn to_regex_source(&self) -> String {
        let mut source = String::from("^");
        for segment in &self.segments {
            match segment {
                FormatSegment::Digits { min, max } => {
                    source.push_str(&format!("[0-9]{{{},{}}}", min, max));
                }
                FormatSegment::Letters { min, max } => {
                    source.push_str(&format!("[A-Z]{{{},{}}}", min, max));
                }
                FormatSegment::Literal { value } => {
                    source.push_str(&regex::escape(&value.to_uppercase()));
                }
            }
        }
        source.push('$');
        source
    }
}

// ==========================================
// LocationPattern - 正则库位模式
// ==========================================
// 始终按全匹配使用，部分匹配不算命中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPattern {
    pub pattern: String,
    pub location_type: LocationType,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default = "default_pattern_confidence")]
    pub confidence: f64,
}

// ==========================================
// ColdChainClass - 冷链品类
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColdChainClass {
    pub name: String,
    pub keywords: Vec<String>, // 品名包含任一关键字（不区分大小写）即命中
    #[serde(default)]
    pub threshold_minutes: Option<i64>, // 覆盖默认冷链阈值
}

// ==========================================
// RuleThresholds - 规则阈值
// ==========================================
// 注意: 冷链阈值单位是分钟，其余驻留阈值单位是小时
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    pub stagnation_hours: f64,
    pub aisle_stuck_hours: f64,
    pub cold_chain_minutes: i64,
    pub lot_completion_threshold: f64,
    pub future_tolerance_minutes: i64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            stagnation_hours: 10.0,
            aisle_stuck_hours: 4.0,
            cold_chain_minutes: 30,
            lot_completion_threshold: 0.8,
            future_tolerance_minutes: 0,
        }
    }
}

// ==========================================
// WarehouseConfig - 仓库配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseConfig {
    #[serde(default)]
    pub warehouse_id: String,
    #[serde(default)]
    pub special_locations: Vec<SpecialLocation>,
    #[serde(default)]
    pub location_formats: Vec<LocationFormat>,
    #[serde(default)]
    pub location_patterns: Vec<LocationPattern>,
    #[serde(default)]
    pub type_capacities: BTreeMap<LocationType, u32>,
    #[serde(default)]
    pub location_capacities: BTreeMap<String, u32>,
    #[serde(default)]
    pub thresholds: RuleThresholds,
    #[serde(default)]
    pub cold_chain_classes: Vec<ColdChainClass>,
    #[serde(default)]
    pub location_mapping_enabled: bool,
    #[serde(default)]
    pub disabled_rules: Vec<RuleKind>,
    /// 歧义消解优先级（靠前优先）
    #[serde(default = "default_type_precedence")]
    pub type_precedence: Vec<LocationType>,
    /// 超过该记录数时规则并行执行
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_format_type() -> LocationType {
    LocationType::Storage
}

fn default_format_confidence() -> f64 {
    0.9
}

fn default_pattern_confidence() -> f64 {
    0.8
}

fn default_type_precedence() -> Vec<LocationType> {
    vec![
        LocationType::Dock,
        LocationType::Receiving,
        LocationType::Staging,
        LocationType::Aisle,
        LocationType::Storage,
    ]
}

fn default_parallel_threshold() -> usize {
    2_000
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            warehouse_id: String::new(),
            special_locations: Vec::new(),
            location_formats: Vec::new(),
            location_patterns: Vec::new(),
            type_capacities: BTreeMap::new(),
            location_capacities: BTreeMap::new(),
            thresholds: RuleThresholds::default(),
            cold_chain_classes: Vec::new(),
            location_mapping_enabled: false,
            disabled_rules: Vec::new(),
            type_precedence: default_type_precedence(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

/// 分钟级阈值上限（十年）
pub const MAX_THRESHOLD_MINUTES: i64 = 10 * 366 * 24 * 60;

impl WarehouseConfig {
    pub fn new(warehouse_id: &str) -> Self {
        Self {
            warehouse_id: warehouse_id.to_string(),
            ..Self::default()
        }
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// 规则是否启用
    ///
    /// LOCATION_MAPPING 额外受 location_mapping_enabled 控制
    pub fn is_rule_enabled(&self, rule: RuleKind) -> bool {
        if self.disabled_rules.contains(&rule) {
            return false;
        }
        match rule {
            RuleKind::LocationMapping => self.location_mapping_enabled,
            _ => true,
        }
    }

    /// 校验配置
    ///
    /// # 规则
    /// 1. 驻留阈值 > 0（小时），冷链阈值 ∈ (0, MAX]（分钟），未来容差 ∈ [0, MAX]
    /// 2. 批次完成阈值 ∈ (0, 1]
    /// 3. 特殊库位编码/别名非空
    /// 4. 格式描述符: 段非空, 0 < max, min <= max, 置信度 ∈ [0, 1]
    /// 5. 每个可被分类出的类型都必须能查到容量
    /// 6. 冷链品类名称与关键字非空
    pub fn validate(&self) -> EngineResult<()> {
        let t = &self.thresholds;
        if !(t.stagnation_hours.is_finite() && t.stagnation_hours > 0.0) {
            return Err(EngineError::config(
                "thresholds.stagnation_hours",
                format!("必须为正数，实际 {}", t.stagnation_hours),
            ));
        }
        if !(t.aisle_stuck_hours.is_finite() && t.aisle_stuck_hours > 0.0) {
            return Err(EngineError::config(
                "thresholds.aisle_stuck_hours",
                format!("必须为正数，实际 {}", t.aisle_stuck_hours),
            ));
        }
        if t.cold_chain_minutes <= 0 || t.cold_chain_minutes > MAX_THRESHOLD_MINUTES {
            return Err(EngineError::config(
                "thresholds.cold_chain_minutes",
                format!(
                    "必须为 (0, {}] 内的整数分钟，实际 {}",
                    MAX_THRESHOLD_MINUTES, t.cold_chain_minutes
                ),
            ));
        }
        if !(t.lot_completion_threshold > 0.0 && t.lot_completion_threshold <= 1.0) {
            return Err(EngineError::config(
                "thresholds.lot_completion_threshold",
                format!("必须在 (0, 1] 内，实际 {}", t.lot_completion_threshold),
            ));
        }
        if !(0..=MAX_THRESHOLD_MINUTES).contains(&t.future_tolerance_minutes) {
            return Err(EngineError::config(
                "thresholds.future_tolerance_minutes",
                format!(
                    "必须在 [0, {}] 内，实际 {}",
                    MAX_THRESHOLD_MINUTES, t.future_tolerance_minutes
                ),
            ));
        }

        for special in &self.special_locations {
            if special.code.trim().is_empty() {
                return Err(EngineError::config("special_locations.code", "库位编码为空"));
            }
            if special.aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(EngineError::config(
                    "special_locations.aliases",
                    format!("库位 {} 存在空别名", special.code),
                ));
            }
            if special.location_type == LocationType::Invalid {
                return Err(EngineError::config(
                    "special_locations.location_type",
                    format!("库位 {} 不能声明为 INVALID", special.code),
                ));
            }
            self.require_capacity(special.location_type, special.capacity)?;
        }

        for format in &self.location_formats {
            if format.segments.is_empty() {
                return Err(EngineError::config(
                    "location_formats.segments",
                    format!("格式 v{} 没有任何段", format.version),
                ));
            }
            for segment in &format.segments {
                match segment {
                    FormatSegment::Digits { min, max } | FormatSegment::Letters { min, max } => {
                        if *max == 0 || min > max {
                            return Err(EngineError::config(
                                "location_formats.segments",
                                format!("格式 v{} 段长度非法: min={} max={}", format.version, min, max),
                            ));
                        }
                    }
                    FormatSegment::Literal { value } => {
                        if value.is_empty() {
                            return Err(EngineError::config(
                                "location_formats.segments",
                                format!("格式 v{} 含空字面量段", format.version),
                            ));
                        }
                    }
                }
            }
            check_confidence("location_formats.confidence", format.confidence)?;
            if format.location_type == LocationType::Invalid {
                return Err(EngineError::config(
                    "location_formats.location_type",
                    format!("格式 v{} 不能声明为 INVALID", format.version),
                ));
            }
            self.require_capacity(format.location_type, format.capacity)?;
        }

        for pattern in &self.location_patterns {
            if pattern.pattern.trim().is_empty() {
                return Err(EngineError::config("location_patterns.pattern", "模式为空"));
            }
            check_confidence("location_patterns.confidence", pattern.confidence)?;
            if pattern.location_type == LocationType::Invalid {
                return Err(EngineError::config(
                    "location_patterns.location_type",
                    format!("模式 {} 不能声明为 INVALID", pattern.pattern),
                ));
            }
            self.require_capacity(pattern.location_type, pattern.capacity)?;
        }

        for class in &self.cold_chain_classes {
            if class.name.trim().is_empty() {
                return Err(EngineError::config("cold_chain_classes.name", "冷链品类名称为空"));
            }
            if class.keywords.is_empty() || class.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(EngineError::config(
                    "cold_chain_classes.keywords",
                    format!("冷链品类 {} 关键字为空", class.name),
                ));
            }
            if let Some(minutes) = class.threshold_minutes {
                if minutes <= 0 || minutes > MAX_THRESHOLD_MINUTES {
                    return Err(EngineError::config(
                        "cold_chain_classes.threshold_minutes",
                        format!(
                            "冷链品类 {} 阈值必须在 (0, {}] 内，实际 {}",
                            class.name, MAX_THRESHOLD_MINUTES, minutes
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    fn require_capacity(&self, location_type: LocationType, explicit: Option<u32>) -> EngineResult<()> {
        if explicit.is_none() && !self.type_capacities.contains_key(&location_type) {
            return Err(EngineError::MissingCapacity { location_type });
        }
        Ok(())
    }
}

fn check_confidence(field: &str, confidence: f64) -> EngineResult<()> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(EngineError::config(
            field,
            format!("置信度必须在 [0, 1] 内，实际 {}", confidence),
        ));
    }
    Ok(())
}
