// ==========================================
// 仓储库存异常检测引擎 - 配置层
// ==========================================
// 职责: 仓库配置结构定义、加载与校验
// 说明: 配置的持久化与格式学习在外部，引擎只接收只读快照
// ==========================================

pub mod warehouse_config;

pub use warehouse_config::{
    ColdChainClass, FormatSegment, LocationFormat, LocationPattern, RuleThresholds,
    SpecialLocation, WarehouseConfig,
};
