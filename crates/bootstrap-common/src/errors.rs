//! 错误类型定义

use thiserror::Error;

/// 装配引擎错误类型
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("条件无法实例化: {condition}, 所属候选: {candidate}")]
    ConditionInstantiation { condition: String, candidate: String },

    #[error("条件评估失败: {condition}, 原因: {message}")]
    ConditionEvaluation { condition: String, message: String },

    #[error("过滤器规则无效: {message}")]
    InvalidFilter { message: String },

    #[error("定义注册失败: {name}, 原因: {message}")]
    Registration { name: String, message: String },

    #[error("导入解析失败: {unit}, 原因: {message}")]
    ImportResolution { unit: String, message: String },

    #[error("元数据无效: {type_name}, 原因: {message}")]
    InvalidMetadata { type_name: String, message: String },

    #[error("引导流程失败: {message}")]
    BootstrapFailed { message: String },
}

impl BootstrapError {
    /// 创建条件实例化错误
    pub fn condition_instantiation(
        condition: impl Into<String>,
        candidate: impl Into<String>,
    ) -> Self {
        Self::ConditionInstantiation {
            condition: condition.into(),
            candidate: candidate.into(),
        }
    }

    /// 创建注册错误
    pub fn registration(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registration {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type BootstrapResult<T> = Result<T, BootstrapError>;
