// ==========================================
// 仓储库存异常检测引擎 - 领域模型层
// ==========================================
// 职责: 定义库存记录、库位分类、异常发现、评估报告
// 红线: 不含引擎逻辑
// ==========================================

pub mod finding;
pub mod inventory;
pub mod location;
pub mod report;
pub mod types;

// 重导出核心类型
pub use finding::{ConsolidatedFinding, Evidence, Finding};
pub use inventory::{InventoryRecord, PalletRecord, RecordWarning};
pub use location::LocationClassification;
pub use report::{EvaluationReport, EvaluationSummary, RuleOutcome, RuleSummary};
pub use types::{LocationType, MatchTier, Priority, RuleKind, RuleStatus};
