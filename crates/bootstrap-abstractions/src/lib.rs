//! # Bootstrap Abstractions
//!
//! 装配引擎消费的外部协作者抽象接口。引擎核心只通过这些窄接口
//! 与宿主环境交互，不包含任何网络/文件/CLI 表面。
//!
//! ## 核心接口
//!
//! - [`TypeUniverse`] - 反射/类型内省提供者
//! - [`Environment`] - 环境与属性源访问
//! - [`DefinitionRegistry`] - 定义注册表/工厂
//! - [`Condition`] - 命名谓词能力
//! - [`ImportSelector`] - 动态导入选择器能力
//! - [`EvaluationContext`] - 一次引导运行内共享的评估上下文

pub mod condition;
pub mod environment;
pub mod reflection;
pub mod registry;

pub use condition::*;
pub use environment::*;
pub use reflection::*;
pub use registry::*;
