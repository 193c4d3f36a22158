// ==========================================
// 仓储库存异常检测引擎 - 库位分类器
// ==========================================
// 职责: 原始库位字符串 → {类型, 容量, 是否特殊, 置信度}
// 匹配顺序: 1. 特殊库位精确匹配 2. 格式描述符/正则全匹配 3. INVALID
// 红线: 全函数，不报错；部分符合格式仍是 INVALID
// 缓存: DashMap 读穿透，同一原始字符串只计算一次（先写者胜）
// ==========================================

use crate::config::WarehouseConfig;
use crate::domain::location::LocationClassification;
use crate::domain::types::{LocationType, MatchTier};
use crate::engine::error::{EngineError, EngineResult};
use dashmap::DashMap;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// 库位归一化：去首尾空白并转大写
pub fn normalize_location(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// 特殊库位条目（同一编码可能被多个条目声明）
#[derive(Debug, Clone)]
struct SpecialEntry {
    code: String,
    location_type: LocationType,
    capacity: Option<u32>,
}

// 结构匹配器（格式描述符或正则模式）
#[derive(Debug)]
struct StructuralMatcher {
    regex: Regex,
    source: String,
    location_type: LocationType,
    capacity: Option<u32>,
    confidence: f64,
    tier: MatchTier,
    format_version: Option<u32>,
}

// ==========================================
// LocationClassifier - 库位分类器
// ==========================================
pub struct LocationClassifier {
    special: HashMap<String, Vec<SpecialEntry>>,
    matchers: Vec<StructuralMatcher>,
    type_capacities: HashMap<LocationType, u32>,
    location_capacities: HashMap<String, u32>,
    precedence: Vec<LocationType>,
    cache: DashMap<String, Arc<LocationClassification>>,
}

impl LocationClassifier {
    /// 根据配置构建分类器（编译全部模式）
    ///
    /// # 错误
    /// - InvalidPattern: 正则无法编译
    pub fn new(config: &WarehouseConfig) -> EngineResult<Self> {
        let mut special: HashMap<String, Vec<SpecialEntry>> = HashMap::new();
        for location in &config.special_locations {
            let entry = SpecialEntry {
                code: location.code.clone(),
                location_type: location.location_type,
                capacity: location.capacity,
            };
            let keys = std::iter::once(&location.code).chain(location.aliases.iter());
            for key in keys {
                let bucket = special.entry(normalize_location(key)).or_default();
                // 同一条目的编码与别名重复时只记一次
                if !bucket
                    .iter()
                    .any(|e| e.code == entry.code && e.location_type == entry.location_type)
                {
                    bucket.push(entry.clone());
                }
            }
        }

        // 格式描述符按版本降序（新版本优先），随后是正则模式
        let mut formats: Vec<_> = config.location_formats.iter().collect();
        formats.sort_by(|a, b| b.version.cmp(&a.version));

        let mut matchers = Vec::with_capacity(formats.len() + config.location_patterns.len());
        for format in formats {
            let source = format.to_regex_source();
            let regex = Regex::new(&source).map_err(|e| EngineError::InvalidPattern {
                pattern: source.clone(),
                source: e,
            })?;
            matchers.push(StructuralMatcher {
                regex,
                source,
                location_type: format.location_type,
                capacity: format.capacity,
                confidence: format.confidence,
                tier: MatchTier::Format,
                format_version: Some(format.version),
            });
        }
        for pattern in &config.location_patterns {
            let source = format!("^(?:{})$", pattern.pattern);
            let regex = RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .map_err(|e| EngineError::InvalidPattern {
                    pattern: pattern.pattern.clone(),
                    source: e,
                })?;
            matchers.push(StructuralMatcher {
                regex,
                source,
                location_type: pattern.location_type,
                capacity: pattern.capacity,
                confidence: pattern.confidence,
                tier: MatchTier::Pattern,
                format_version: None,
            });
        }

        let location_capacities = config
            .location_capacities
            .iter()
            .map(|(k, v)| (normalize_location(k), *v))
            .collect();

        Ok(Self {
            special,
            matchers,
            type_capacities: config.type_capacities.iter().map(|(k, v)| (*k, *v)).collect(),
            location_capacities,
            precedence: config.type_precedence.clone(),
            cache: DashMap::new(),
        })
    }

    /// 分类（带缓存）
    pub fn classify(&self, raw_location: &str) -> Arc<LocationClassification> {
        if let Some(hit) = self.cache.get(raw_location) {
            return Arc::clone(hit.value());
        }
        let entry = self
            .cache
            .entry(raw_location.to_string())
            .or_insert_with(|| Arc::new(self.classify_uncached(raw_location)));
        Arc::clone(entry.value())
    }

    /// 已缓存的不同原始库位数
    pub fn cached_locations(&self) -> usize {
        self.cache.len()
    }

    /// 分类（不经缓存的纯计算）
    pub fn classify_uncached(&self, raw_location: &str) -> LocationClassification {
        let key = normalize_location(raw_location);
        if key.is_empty() {
            return LocationClassification::invalid(raw_location);
        }

        // ===== 层级 1: 特殊库位 =====
        if let Some(entries) = self.special.get(&key) {
            let chosen = self.resolve_special(raw_location, entries);
            return LocationClassification {
                raw_location: raw_location.to_string(),
                location_type: chosen.location_type,
                capacity: self.capacity_for(&key, chosen.location_type, chosen.capacity),
                is_special: true,
                confidence: 1.0,
                matched_by: MatchTier::Special,
                format_version: None,
            };
        }

        // ===== 层级 2: 结构匹配 =====
        let hits: Vec<&StructuralMatcher> = self
            .matchers
            .iter()
            .filter(|m| m.regex.is_match(&key))
            .collect();
        if let Some(chosen) = self.resolve_structural(raw_location, &hits) {
            return LocationClassification {
                raw_location: raw_location.to_string(),
                location_type: chosen.location_type,
                capacity: self.capacity_for(&key, chosen.location_type, chosen.capacity),
                is_special: false,
                confidence: chosen.confidence,
                matched_by: chosen.tier,
                format_version: chosen.format_version,
            };
        }

        // ===== 层级 3: 兜底 INVALID =====
        LocationClassification::invalid(raw_location)
    }

    /// 容量查找: 单库位覆盖 → 条目容量 → 类型默认
    fn capacity_for(&self, key: &str, location_type: LocationType, explicit: Option<u32>) -> u32 {
        if location_type == LocationType::Invalid {
            return 0;
        }
        self.location_capacities
            .get(key)
            .copied()
            .or(explicit)
            .or_else(|| self.type_capacities.get(&location_type).copied())
            .unwrap_or(0)
    }

    fn precedence_rank(&self, location_type: LocationType) -> usize {
        self.precedence
            .iter()
            .position(|t| *t == location_type)
            .unwrap_or(self.precedence.len())
    }

    /// 特殊库位歧义消解: 按类型优先级，同级按配置顺序
    fn resolve_special<'a>(&self, raw_location: &str, entries: &'a [SpecialEntry]) -> &'a SpecialEntry {
        let mut chosen = &entries[0];
        for entry in &entries[1..] {
            if self.precedence_rank(entry.location_type) < self.precedence_rank(chosen.location_type) {
                chosen = entry;
            }
        }
        if entries.len() > 1 {
            let candidates: Vec<String> = entries
                .iter()
                .map(|e| format!("{}:{}", e.code, e.location_type))
                .collect();
            warn!(
                raw_location = %raw_location,
                candidates = ?candidates,
                chosen = %chosen.location_type,
                "特殊库位匹配歧义，按优先级消解"
            );
        }
        chosen
    }

    /// 结构匹配歧义消解: 类型不同时按优先级，同类型取第一个
    fn resolve_structural<'a>(
        &self,
        raw_location: &str,
        hits: &[&'a StructuralMatcher],
    ) -> Option<&'a StructuralMatcher> {
        let mut chosen: &'a StructuralMatcher = hits.first().copied()?;
        for matcher in hits.iter().copied().skip(1) {
            if self.precedence_rank(matcher.location_type) < self.precedence_rank(chosen.location_type) {
                chosen = matcher;
            }
        }
        if hits.iter().any(|m| m.location_type != chosen.location_type) {
            let sources: Vec<&str> = hits.iter().map(|m| m.source.as_str()).collect();
            warn!(
                raw_location = %raw_location,
                patterns = ?sources,
                chosen = %chosen.location_type,
                "库位格式匹配歧义，按优先级消解"
            );
        }
        Some(chosen)
    }
}
