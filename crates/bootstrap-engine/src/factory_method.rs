//! 工厂方法解析器
//!
//! 把配置单元上声明的工厂方法转换为完整的组件定义：解析名称、
//! 描述、作用域、设计与生命周期元数据、装配模式、依赖边与回溯
//! 引用。所属单元的代理策略最后无条件覆盖作用域。

use crate::config_unit::ConfigurationUnit;
use crate::run::BootstrapRun;
use crate::scanner::apply_common_markers;
use bootstrap_abstractions::EvaluationContext;
use bootstrap_common::{
    ComponentDefinition, FactoryMethodDescriptor, Marker, MarkerKind, MethodMeta,
    NamingConventions, ReturnKind, ScopeDescriptor, ScopePolicy,
};
use tracing::{debug, warn};

/// 工厂方法解析器
#[derive(Debug, Default)]
pub struct FactoryMethodResolver;

impl FactoryMethodResolver {
    /// 把一个工厂方法转换为组件定义
    ///
    /// 返回类型无法静态确定时静默跳过（debug 级日志）；void 返回
    /// 类型是不可用方法，给出警告但不中止运行。
    pub async fn resolve(
        ctx: &EvaluationContext,
        run: &BootstrapRun,
        unit: &ConfigurationUnit,
        method: &MethodMeta,
    ) -> Option<ComponentDefinition> {
        let produced_type = match &method.return_type {
            ReturnKind::Type(name) => name.clone(),
            ReturnKind::Unresolved => {
                debug!(
                    "工厂方法返回类型无法静态确定, 跳过: unit={}, method={}",
                    unit.name(),
                    method.name
                );
                return None;
            }
            ReturnKind::Void => {
                warn!(
                    "工厂方法返回 void, 不可用作组件: unit={}, method={}",
                    unit.name(),
                    method.name
                );
                return None;
            }
        };

        let factory_marker = method.marker_of(MarkerKind::FactoryMethod);
        let mut name = match factory_marker {
            Some(Marker::FactoryMethod {
                name: Some(explicit),
                ..
            }) => explicit.clone(),
            _ => method.name.clone(),
        };
        // 名称冲突时以所属单元名称命名空间化
        if ctx.sees_definition(&name).await {
            name = NamingConventions::namespaced(unit.name(), &name);
        }

        let declared_scope = match method.marker_of(MarkerKind::Scope) {
            Some(Marker::Scope { scope }) => Some(scope.clone()),
            _ => None,
        };
        let scope = declared_scope
            .or_else(|| unit.unit_scope_override.clone())
            .unwrap_or_else(|| match &unit.scope_policy {
                ScopePolicy::MarkerDefault => ScopeDescriptor::default(),
                ScopePolicy::Fixed(fixed) => fixed.clone(),
            });

        let mut definition = ComponentDefinition::new(name, produced_type.clone())
            .with_scope(scope);
        definition = apply_common_markers(definition, &method.markers);

        if let Some(Marker::FactoryMethod {
            init_method,
            destroy_method,
            enforce_init,
            enforce_destroy,
            autowire,
            ..
        }) = factory_marker
        {
            definition.lifecycle.init_method = init_method.clone();
            definition.lifecycle.destroy_method = destroy_method.clone();
            definition.lifecycle.enforce_init = *enforce_init;
            definition.lifecycle.enforce_destroy = *enforce_destroy;
            definition.autowire = *autowire;
        }

        definition.factory_method = Some(FactoryMethodDescriptor {
            config_unit_name: unit.name().to_string(),
            method_name: method.name.clone(),
            declaring_type: unit.qualified_name().to_string(),
        });
        definition.owning_unit = Some(unit.name().to_string());
        definition.proxy_eligible = unit.proxy_unit_methods;
        run.mark_converted(&produced_type);

        // 代理策略的作用域覆盖无条件发生在所有解析之后
        definition.scope = if unit.proxy_unit_methods {
            ScopeDescriptor::Singleton
        } else {
            ScopeDescriptor::Prototype
        };

        debug!(
            "解析工厂方法: unit={}, method={}, name={}, scope={:?}",
            unit.name(),
            method.name,
            definition.name,
            definition.scope
        );
        Some(definition)
    }
}
