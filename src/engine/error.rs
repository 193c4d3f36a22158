// ==========================================
// 仓储库存异常检测引擎 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 配置错误在任何规则执行前暴露；记录缺失字段不是错误（走 RecordWarning）
// ==========================================

use crate::domain::types::LocationType;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 配置错误（致命，规则执行前暴露）=====
    #[error("配置错误 (field: {field}): {message}")]
    Configuration { field: String, message: String },

    #[error("库位模式无法编译 (pattern: {pattern}): {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("库位类型缺少容量配置: {location_type}")]
    MissingCapacity { location_type: LocationType },

    // ===== 运行错误 =====
    #[error("规则执行线程异常: {0}")]
    Worker(String),

    // ===== 外部格式 =====
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
