//! 配置单元与配置单元构建器
//!
//! 配置单元包装一个被识别为配置来源的定义，携带代理策略与作用域
//! 解析策略。每个限定类型名在一次运行内最多解析一次。

use crate::conditions::ConditionEvaluator;
use crate::run::BootstrapRun;
use crate::scanner::{apply_common_markers, resolve_scope};
use bootstrap_abstractions::EvaluationContext;
use bootstrap_common::{
    BootstrapResult, ComponentDefinition, ImportRef, MethodMeta, NamingConventions, ScanDirective,
    ScopeDescriptor, ScopePolicy, TypeMeta,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// 配置单元
///
/// 创建后扫描指令/导入引用/工厂方法从元数据按需读取，不再回写
#[derive(Debug, Clone)]
pub struct ConfigurationUnit {
    /// 单元自身的定义
    pub definition: ComponentDefinition,
    /// 单元的声明式元数据
    pub meta: Arc<TypeMeta>,
    /// 代理策略：单元方法间调用是否经过代理
    pub proxy_unit_methods: bool,
    /// 作用域解析策略
    pub scope_policy: ScopePolicy,
    /// 单元级作用域覆盖，作用于工厂方法产出的定义
    pub unit_scope_override: Option<ScopeDescriptor>,
}

impl ConfigurationUnit {
    /// 单元的注册名称
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// 单元的限定类型名
    pub fn qualified_name(&self) -> &str {
        &self.meta.qualified_name
    }

    /// 单元上声明的扫描指令
    pub fn scan_directives(&self) -> Vec<&ScanDirective> {
        self.meta.scan_directives()
    }

    /// 单元上声明的导入引用
    pub fn import_refs(&self) -> Vec<&ImportRef> {
        self.meta.import_refs()
    }

    /// 单元上声明的工厂方法
    pub fn factory_methods(&self) -> Vec<&MethodMeta> {
        self.meta.factory_methods()
    }

    /// 一个类型是否为配置单元候选
    ///
    /// 显式配置标记、扫描指令、导入引用或工厂方法，任一存在即是
    pub fn is_candidate(meta: &TypeMeta) -> bool {
        meta.is_configuration()
            || !meta.scan_directives().is_empty()
            || !meta.import_refs().is_empty()
            || !meta.factory_methods().is_empty()
    }
}

/// 配置单元构建器
#[derive(Debug, Default)]
pub struct ConfigurationUnitBuilder;

impl ConfigurationUnitBuilder {
    /// 构建配置单元
    ///
    /// 类型已在处理中（循环保护）或未通过谓词评估时返回 None
    pub async fn build(
        ctx: &EvaluationContext,
        run: &BootstrapRun,
        meta: Arc<TypeMeta>,
    ) -> BootstrapResult<Option<ConfigurationUnit>> {
        if !run.mark_unit_processed(&meta.qualified_name) {
            trace!("配置单元已处理过, 跳过: type={}", meta.qualified_name);
            return Ok(None);
        }
        if !ConditionEvaluator::should_include(ctx, &meta.markers, &meta.qualified_name).await? {
            debug!("配置单元未通过条件评估: type={}", meta.qualified_name);
            return Ok(None);
        }

        let proxy_unit_methods = meta.proxy_unit_methods().unwrap_or(true);
        let scope_policy = meta
            .scan_directives()
            .iter()
            .find_map(|d| d.scope_policy.clone())
            .unwrap_or_default();
        let unit_scope_override = meta.declared_scope().cloned();

        let name = meta
            .component_name_override()
            .map(str::to_string)
            .unwrap_or_else(|| NamingConventions::component_name(&meta.qualified_name));
        let definition = ComponentDefinition::new(name, meta.qualified_name.clone())
            .with_scope(resolve_scope(&ScopePolicy::MarkerDefault, meta.declared_scope()));
        let definition = apply_common_markers(definition, &meta.markers);

        debug!(
            "构建配置单元: name={}, type={}, proxy={}",
            definition.name, meta.qualified_name, proxy_unit_methods
        );
        Ok(Some(ConfigurationUnit {
            definition,
            meta,
            proxy_unit_methods,
            scope_policy,
            unit_scope_override,
        }))
    }
}
