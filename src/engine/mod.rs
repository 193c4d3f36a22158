// ==========================================
// 仓储库存异常检测引擎 - 引擎层
// ==========================================
// 职责: 库位分类、占用/批次统计、八条异常规则、检出合并
// 红线: 引擎不读文件、不访问数据库，所有检出必须输出 reason
// ==========================================

pub mod aggregator;
pub mod capacity_tracker;
pub mod error;
pub mod integrity_scanner;
pub mod location_classifier;
pub mod lot_tracker;
pub mod rule_core;
pub mod rule_engine;
pub mod rules;
pub mod snapshot;

// 重导出核心引擎
pub use aggregator::FindingAggregator;
pub use capacity_tracker::{CapacityTracker, LocationOccupancy};
pub use error::{EngineError, EngineResult};
pub use integrity_scanner::{DuplicateGroup, FutureDated, IntegrityScanner};
pub use location_classifier::{normalize_location, LocationClassifier};
pub use lot_tracker::{LotProgress, LotTracker};
pub use rule_core::RuleCore;
pub use rule_engine::{evaluate, RuleEngine};
pub use rules::{evaluator_for, EvaluationContext, RuleEvaluator};
pub use snapshot::{SnapshotValidator, ValidatedSnapshot};
