// ==========================================
// WarehouseConfig 加载与校验集成测试
// ==========================================
// 测试目标: JSON 文件加载、默认值、配置错误在规则执行前暴露
// ==========================================

mod helpers;

use helpers::mock_config::default_config;
use std::io::Write;
use tempfile::NamedTempFile;
use warehouse_anomaly::config::{LocationPattern, WarehouseConfig};
use warehouse_anomaly::domain::types::{LocationType, RuleKind};
use warehouse_anomaly::{EngineError, RuleEngine};

const CONFIG_JSON: &str = r#"{
    "warehouse_id": "WH-JSON",
    "special_locations": [
        { "code": "RECV-01", "location_type": "RECEIVING", "capacity": 100, "aliases": ["R1"] }
    ],
    "location_formats": [
        { "version": 1, "segments": [
            { "kind": "DIGITS", "min": 1, "max": 3 },
            { "kind": "LETTERS", "min": 1, "max": 1 }
        ] }
    ],
    "type_capacities": { "STORAGE": 1 },
    "thresholds": { "stagnation_hours": 6.0 },
    "disabled_rules": ["COLD_CHAIN"]
}"#;

#[test]
fn test_load_config_from_file_with_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CONFIG_JSON.as_bytes()).unwrap();

    let config = WarehouseConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.warehouse_id, "WH-JSON");
    assert_eq!(config.special_locations[0].aliases, vec!["R1".to_string()]);
    assert_eq!(config.location_formats[0].location_type, LocationType::Storage);
    assert_eq!(config.location_formats[0].confidence, 0.9);
    assert_eq!(config.thresholds.stagnation_hours, 6.0);
    // 未给出的阈值取默认值
    assert_eq!(config.thresholds.aisle_stuck_hours, 4.0);
    assert_eq!(config.thresholds.cold_chain_minutes, 30);
    assert!(!config.is_rule_enabled(RuleKind::ColdChain));
    assert!(!config.is_rule_enabled(RuleKind::LocationMapping));
    assert!(config.is_rule_enabled(RuleKind::Stagnant));
    assert_eq!(config.parallel_threshold, 2000);

    assert!(RuleEngine::new(config).is_ok());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = WarehouseConfig::from_json_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(EngineError::Io(_))));
}

#[test]
fn test_malformed_json_is_json_error() {
    assert!(matches!(
        WarehouseConfig::from_json_str("{ not json"),
        Err(EngineError::Json(_))
    ));
}

#[test]
fn test_non_positive_dwell_threshold_rejected() {
    let mut config = default_config();
    config.thresholds.aisle_stuck_hours = -1.0;
    match RuleEngine::new(config) {
        Err(EngineError::Configuration { field, .. }) => {
            assert_eq!(field, "thresholds.aisle_stuck_hours")
        }
        other => panic!("expected configuration error, got {:?}", other.err()),
    }
}

#[test]
fn test_lot_threshold_out_of_range_rejected() {
    for bad in [0.0, 1.5] {
        let mut config = default_config();
        config.thresholds.lot_completion_threshold = bad;
        assert!(matches!(
            RuleEngine::new(config),
            Err(EngineError::Configuration { .. })
        ));
    }
    let mut config = default_config();
    config.thresholds.lot_completion_threshold = 1.0;
    assert!(RuleEngine::new(config).is_ok());
}

#[test]
fn test_malformed_regex_rejected_before_evaluation() {
    let mut config = default_config();
    config.location_patterns.push(LocationPattern {
        pattern: "DOCK-[".to_string(),
        location_type: LocationType::Dock,
        capacity: Some(4),
        confidence: 0.8,
    });
    assert!(matches!(
        RuleEngine::new(config),
        Err(EngineError::InvalidPattern { .. })
    ));
}

#[test]
fn test_missing_type_capacity_rejected() {
    let mut config = default_config();
    config.type_capacities.remove(&LocationType::Aisle);
    assert!(matches!(
        RuleEngine::new(config),
        Err(EngineError::MissingCapacity {
            location_type: LocationType::Aisle
        })
    ));
}

#[test]
fn test_empty_special_code_rejected() {
    let mut config = default_config();
    config.special_locations[0].code = "  ".to_string();
    assert!(matches!(
        RuleEngine::new(config),
        Err(EngineError::Configuration { .. })
    ));
}

#[test]
fn test_oversized_cold_chain_minutes_rejected() {
    let mut config = default_config();
    config.thresholds.cold_chain_minutes = i64::MAX;
    match RuleEngine::new(config) {
        Err(EngineError::Configuration { field, .. }) => {
            assert_eq!(field, "thresholds.cold_chain_minutes")
        }
        other => panic!("expected configuration error, got {:?}", other.err()),
    }
}

#[test]
fn test_oversized_future_tolerance_rejected() {
    let mut config = default_config();
    config.thresholds.future_tolerance_minutes = 1_000_000_000_000;
    match RuleEngine::new(config) {
        Err(EngineError::Configuration { field, .. }) => {
            assert_eq!(field, "thresholds.future_tolerance_minutes")
        }
        other => panic!("expected configuration error, got {:?}", other.err()),
    }
}

#[test]
fn test_oversized_cold_chain_class_threshold_rejected() {
    let mut config = default_config();
    config.cold_chain_classes[0].threshold_minutes = Some(i64::MAX);
    assert!(matches!(
        RuleEngine::new(config),
        Err(EngineError::Configuration { .. })
    ));
}
