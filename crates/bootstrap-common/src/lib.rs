//! # Bootstrap Common
//!
//! 这个 crate 提供组件装配引擎的公共数据模型与元数据模式。
//!
//! ## 核心类型
//!
//! - [`ComponentDefinition`] - 可注册的组件定义
//! - [`TypeMeta`] / [`MethodMeta`] - 候选类型与方法的声明式元数据
//! - [`Marker`] - 声明式标记（配置单元、扫描指令、导入指令、条件等）
//! - [`NamingConventions`] - 组件命名约定规范
//! - [`BootstrapError`] - 统一错误类型
//!
//! ## 设计原则
//!
//! - 元数据采用显式结构体而非运行时反射，支持 serde 序列化
//! - 定义在注册前保持可变，由流水线各阶段独占持有
//! - 约定优于配置

pub mod definition;
pub mod errors;
pub mod metadata;
pub mod naming;

pub use definition::*;
pub use errors::*;
pub use metadata::*;
pub use naming::*;
