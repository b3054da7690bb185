//! 包扫描器
//!
//! 枚举指定包内声明的类型，依次通过谓词评估器与过滤器集合，
//! 为存活的候选合成组件定义。已扫描过的包是幂等空操作。

use crate::conditions::ConditionEvaluator;
use crate::filters::FilterSet;
use crate::run::BootstrapRun;
use bootstrap_abstractions::EvaluationContext;
use bootstrap_common::{
    BootstrapResult, ComponentDefinition, Marker, NamingPolicy, ScopeDescriptor, ScopePolicy,
    TypeKind, TypeMeta,
};
use tracing::{debug, trace};

/// 按作用域解析策略为候选解析作用域
pub(crate) fn resolve_scope(
    policy: &ScopePolicy,
    declared: Option<&ScopeDescriptor>,
) -> ScopeDescriptor {
    match policy {
        ScopePolicy::MarkerDefault => declared.cloned().unwrap_or_default(),
        ScopePolicy::Fixed(scope) => scope.clone(),
    }
}

/// 把候选上的通用标记应用到定义上
///
/// 覆盖懒初始化、首选、排序、角色、显式依赖与描述
pub(crate) fn apply_common_markers(
    mut definition: ComponentDefinition,
    markers: &[Marker],
) -> ComponentDefinition {
    for marker in markers {
        match marker {
            Marker::Lazy { value } => definition.lifecycle.lazy_init = *value,
            Marker::Primary => definition.design.primary = true,
            Marker::Order { value } => definition.design.order = Some(*value),
            Marker::Role { role } => definition.design.role = *role,
            Marker::DependsOn { refs } => definition.depends_on.extend(refs.iter().cloned()),
            Marker::Description { text } => definition.description = Some(text.clone()),
            _ => {}
        }
    }
    definition
}

/// 包扫描器
#[derive(Debug, Default)]
pub struct PackageScanner;

impl PackageScanner {
    /// 扫描一个包并返回新合成的定义
    ///
    /// 定义会追加进共享上下文的在途列表供后续条件可见，但不注册
    pub async fn scan(
        ctx: &EvaluationContext,
        run: &BootstrapRun,
        package: &str,
        filters: &FilterSet,
        scope_policy: &ScopePolicy,
        naming_policy: &NamingPolicy,
    ) -> BootstrapResult<Vec<ComponentDefinition>> {
        if !run.mark_scanned(package) {
            trace!("包已扫描过, 跳过: package={}", package);
            return Ok(Vec::new());
        }
        debug!("扫描包: package={}", package);

        let mut definitions = Vec::new();
        for meta in ctx.universe().types_in_package(package) {
            // 标记种类本身永远不会成为组件
            if meta.kind == TypeKind::AnnotationKind {
                continue;
            }
            if run.is_converted(&meta.qualified_name) {
                continue;
            }
            if !ConditionEvaluator::should_include(ctx, &meta.markers, &meta.qualified_name).await?
            {
                continue;
            }
            if !filters.accepts(&meta, ctx.universe()) {
                // 自动激活配置一经发现即纳入, 不受扫描过滤器约束
                if !meta.is_auto_activating() {
                    continue;
                }
                run.mark_auto_activated(&meta.qualified_name);
                debug!("自动激活配置绕过扫描过滤器: type={}", meta.qualified_name);
            } else if meta.is_auto_activating() {
                run.mark_auto_activated(&meta.qualified_name);
            }
            if !run.mark_converted(&meta.qualified_name) {
                continue;
            }

            let definition = Self::synthesize(&meta, scope_policy, naming_policy);
            trace!(
                "合成候选定义: name={}, type={}",
                definition.name,
                definition.declaring_type
            );
            ctx.add_pending_definition(definition.clone());
            definitions.push(definition);
        }
        Ok(definitions)
    }

    /// 按命名策略与作用域策略为候选类型合成定义
    pub(crate) fn synthesize(
        meta: &TypeMeta,
        scope_policy: &ScopePolicy,
        naming_policy: &NamingPolicy,
    ) -> ComponentDefinition {
        let name = meta
            .component_name_override()
            .map(str::to_string)
            .unwrap_or_else(|| naming_policy.name_for(&meta.qualified_name));
        let definition = ComponentDefinition::new(name, meta.qualified_name.clone())
            .with_scope(resolve_scope(scope_policy, meta.declared_scope()));
        apply_common_markers(definition, &meta.markers)
    }
}
