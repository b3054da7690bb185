//! 条件与选择器能力接口、共享评估上下文

use crate::environment::{Environment, RuntimeVersionProvider, StaticRuntimeVersion};
use crate::reflection::TypeUniverse;
use crate::registry::DefinitionRegistry;
use async_trait::async_trait;
use bootstrap_common::{BootstrapResult, ComponentDefinition, ImportRef, TypeMeta};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// 命名谓词能力 trait
///
/// 条件自身无状态，状态全部来自注入的评估上下文。条件允许在
/// 评估过程中向上下文登记副作用（例如标记某些类型在后续依赖
/// 检查中忽略），副作用即使在失败路径上也保留。
#[async_trait]
pub trait Condition: Send + Sync {
    /// 评估条件
    async fn matches(&self, ctx: &EvaluationContext) -> BootstrapResult<bool>;

    /// 条件键
    fn key(&self) -> &str;
}

/// 动态导入选择器能力 trait
///
/// 一个具备此能力的类型在被导入时不会直接成为定义，而是返回
/// 一批进一步的导入引用折回处理
#[async_trait]
pub trait ImportSelector: Send + Sync {
    /// 计算进一步的导入引用
    async fn select_imports(
        &self,
        ctx: &EvaluationContext,
        importing: &TypeMeta,
    ) -> BootstrapResult<Vec<ImportRef>>;

    /// 选择器名称
    fn name(&self) -> &str;
}

/// 共享评估上下文
///
/// 一次引导运行期间由所有阶段共享。待注册定义列表是唯一跨阶段
/// 读写共享的资源：追加是同步且单调的，任何写入者都不得移除其他
/// 阶段依赖的条目。
pub struct EvaluationContext {
    environment: Arc<dyn Environment>,
    registry: Arc<dyn DefinitionRegistry>,
    universe: Arc<dyn TypeUniverse>,
    runtime: Arc<dyn RuntimeVersionProvider>,
    /// 已发现但尚未注册的定义，只追加
    pending: RwLock<Vec<ComponentDefinition>>,
    /// 条件副作用登记的忽略依赖类型
    ignored_dependencies: RwLock<HashSet<String>>,
}

impl EvaluationContext {
    /// 创建新的评估上下文
    pub fn new(
        environment: Arc<dyn Environment>,
        registry: Arc<dyn DefinitionRegistry>,
        universe: Arc<dyn TypeUniverse>,
    ) -> Self {
        Self {
            environment,
            registry,
            universe,
            runtime: Arc::new(StaticRuntimeVersion::default()),
            pending: RwLock::new(Vec::new()),
            ignored_dependencies: RwLock::new(HashSet::new()),
        }
    }

    /// 设置运行时版本提供者
    pub fn with_runtime(mut self, runtime: Arc<dyn RuntimeVersionProvider>) -> Self {
        self.runtime = runtime;
        self
    }

    /// 环境提供者
    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    /// 定义注册表
    pub fn registry(&self) -> &dyn DefinitionRegistry {
        self.registry.as_ref()
    }

    /// 类型内省提供者
    pub fn universe(&self) -> &dyn TypeUniverse {
        self.universe.as_ref()
    }

    /// 运行时版本提供者
    pub fn runtime(&self) -> &dyn RuntimeVersionProvider {
        self.runtime.as_ref()
    }

    /// 追加一个待注册定义（同步、单调）
    pub fn add_pending_definition(&self, definition: ComponentDefinition) {
        self.pending.write().push(definition);
    }

    /// 待注册定义快照
    pub fn pending_definitions(&self) -> Vec<ComponentDefinition> {
        self.pending.read().clone()
    }

    /// 指定声明类型是否已有待注册定义
    pub fn has_pending_for_type(&self, qualified_name: &str) -> bool {
        self.pending
            .read()
            .iter()
            .any(|d| d.declaring_type == qualified_name)
    }

    /// 指定名称是否对条件可见：已注册或在途均算
    pub async fn sees_definition(&self, name: &str) -> bool {
        if self.pending.read().iter().any(|d| d.name == name) {
            return true;
        }
        self.registry.contains_definition(name).await
    }

    /// 登记一个在后续依赖检查中忽略的类型（条件副作用）
    pub fn ignore_dependency(&self, type_name: impl Into<String>) {
        self.ignored_dependencies.write().insert(type_name.into());
    }

    /// 指定类型是否被登记为忽略依赖
    pub fn is_dependency_ignored(&self, type_name: &str) -> bool {
        self.ignored_dependencies.read().contains(type_name)
    }
}
