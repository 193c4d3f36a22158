// ==========================================
// 仓储库存异常检测引擎 - 核心库
// ==========================================
// 输入: 已解析的库存快照 + 仓库配置 + 评估时间
// 输出: 按托盘合并、按严重度排序的异常检出
// 系统定位: 规则评估核心（表格解析、报告存储、界面均在外部）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录、库位、检出、报告
pub mod domain;

// 配置层 - 仓库配置
pub mod config;

// 引擎层 - 分类与规则
pub mod engine;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{LocationType, MatchTier, Priority, RuleKind, RuleStatus};

// 领域实体
pub use domain::{
    ConsolidatedFinding, EvaluationReport, EvaluationSummary, Evidence, Finding, InventoryRecord,
    LocationClassification, PalletRecord, RecordWarning, RuleSummary,
};

// 配置
pub use config::WarehouseConfig;

// 引擎
pub use engine::{evaluate, EngineError, EngineResult, LocationClassifier, RuleEngine};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓储库存异常检测引擎";
