// ==========================================
// 测试用仓库配置 - 用于集成测试
// ==========================================

use warehouse_anomaly::config::{
    ColdChainClass, FormatSegment, LocationFormat, LocationPattern, SpecialLocation,
    WarehouseConfig,
};
use warehouse_anomaly::domain::types::LocationType;

/// 特殊库位
pub fn special(code: &str, location_type: LocationType, capacity: u32) -> SpecialLocation {
    SpecialLocation {
        code: code.to_string(),
        location_type,
        capacity: Some(capacity),
        aliases: Vec::new(),
    }
}

/// 存储位格式: 1-3 位数字 + 1 位字母（如 200A）
pub fn storage_format(version: u32) -> LocationFormat {
    LocationFormat {
        version,
        location_type: LocationType::Storage,
        segments: vec![
            FormatSegment::Digits { min: 1, max: 3 },
            FormatSegment::Letters { min: 1, max: 1 },
        ],
        capacity: None,
        confidence: 0.9,
    }
}

/// 创建默认测试配置
///
/// - RECV-01 / RECV-02: 收货区（容量 200，RECV-01 别名 RCV-01）
/// - DOCK-01: 月台（容量 10）
/// - STAGE-01: 暂存区（容量 50）
/// - 200A 形式: 存储位（容量 1）
/// - AISLE-NN: 通道（容量 2）
pub fn default_config() -> WarehouseConfig {
    let mut config = WarehouseConfig::new("WH-TEST");
    let mut recv = special("RECV-01", LocationType::Receiving, 200);
    recv.aliases.push("RCV-01".to_string());
    config.special_locations = vec![
        recv,
        special("RECV-02", LocationType::Receiving, 200),
        special("DOCK-01", LocationType::Dock, 10),
        special("STAGE-01", LocationType::Staging, 50),
    ];
    config.location_formats = vec![storage_format(1)];
    config.location_patterns = vec![LocationPattern {
        pattern: r"AISLE-\d{2}".to_string(),
        location_type: LocationType::Aisle,
        capacity: None,
        confidence: 0.8,
    }];
    config.type_capacities.insert(LocationType::Storage, 1);
    config.type_capacities.insert(LocationType::Aisle, 2);
    config.cold_chain_classes = vec![ColdChainClass {
        name: "FROZEN".to_string(),
        keywords: vec!["frozen".to_string(), "ice cream".to_string()],
        threshold_minutes: None,
    }];
    config
}

/// 启用库位类型一致性检查的配置
pub fn mapping_enabled_config() -> WarehouseConfig {
    let mut config = default_config();
    config.location_mapping_enabled = true;
    config
}

/// 强制规则并行执行的配置
pub fn parallel_config() -> WarehouseConfig {
    let mut config = default_config();
    config.parallel_threshold = 0;
    config
}
