//! # Bootstrap Engine
//!
//! 依赖注入容器的引导解析引擎：给定一批带声明式标记的候选类型，
//! 发现全部配置来源，通过谓词链决定每个候选是否激活，解析单元间
//! 的交叉引用（导入、包扫描、显式依赖），最终产出一组去重、有序、
//! 可实例化的组件定义。
//!
//! ## 流水线
//!
//! ```text
//! 编排器 → 配置单元构建器 → (包扫描器 ⟷ 导入解析器) → 工厂方法解析器 → 最终注册
//! ```
//!
//! ## 使用示例
//!
//! ```no_run
//! use bootstrap_abstractions::{
//!     EvaluationContext, InMemoryDefinitionRegistry, InMemoryTypeUniverse, StaticEnvironment,
//! };
//! use bootstrap_engine::BootstrapOrchestrator;
//! use std::sync::Arc;
//!
//! # async fn example() -> bootstrap_common::BootstrapResult<()> {
//! let ctx = Arc::new(EvaluationContext::new(
//!     Arc::new(StaticEnvironment::new()),
//!     Arc::new(InMemoryDefinitionRegistry::new()),
//!     Arc::new(InMemoryTypeUniverse::builder().build()),
//! ));
//! let report = BootstrapOrchestrator::new(ctx).run().await?;
//! println!("注册 {} 个定义", report.registered.len());
//! # Ok(())
//! # }
//! ```

pub mod conditions;
pub mod config_unit;
pub mod factory_method;
pub mod filters;
pub mod imports;
pub mod orchestrator;
pub mod run;
pub mod scanner;

pub use conditions::{ConditionEvaluator, OnMissingDefinitionCondition};
pub use config_unit::{ConfigurationUnit, ConfigurationUnitBuilder};
pub use factory_method::FactoryMethodResolver;
pub use filters::{FilterSet, TypeFilter};
pub use imports::{ImportOutcome, ImportResolver};
pub use orchestrator::{BootstrapOrchestrator, BootstrapReport};
pub use run::BootstrapRun;
pub use scanner::PackageScanner;
