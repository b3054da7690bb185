//! 引导解析引擎端到端集成测试
//!
//! 通过编排器驱动完整流水线，覆盖幂等扫描、条件组合、循环容忍、
//! 禁用导入与代理作用域覆盖等可测性质。

use async_trait::async_trait;
use bootstrap_abstractions::{
    Condition, DefinitionRegistry, EvaluationContext, ImportSelector, InMemoryDefinitionRegistry,
    InMemoryTypeUniverse, StaticEnvironment, TypeUniverseBuilder,
};
use bootstrap_common::{
    AutowireMode, BootstrapError, BootstrapResult, ComponentDefinition, ConditionKey, FilterSpec,
    ImportRef, Marker, MethodMeta, ReturnKind, ScanDirective, ScopeDescriptor, TypeMeta,
};
use bootstrap_engine::{BootstrapOrchestrator, BootstrapReport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("bootstrap_engine=debug")
            .with_test_writer()
            .try_init();
    });
}

fn component(name: &str) -> TypeMeta {
    TypeMeta::class(name).with_marker(Marker::Component { name: None })
}

fn configuration(name: &str) -> TypeMeta {
    TypeMeta::class(name).with_marker(Marker::Configuration {
        auto_activate: false,
        proxy_unit_methods: true,
    })
}

fn factory_marker() -> Marker {
    Marker::FactoryMethod {
        name: None,
        init_method: None,
        destroy_method: None,
        enforce_init: false,
        enforce_destroy: false,
        autowire: AutowireMode::No,
    }
}

/// 以指定种子配置类型驱动一次完整运行
async fn bootstrap_with_env(
    universe: TypeUniverseBuilder,
    env: StaticEnvironment,
    seed_types: &[&str],
) -> BootstrapResult<(Arc<InMemoryDefinitionRegistry>, BootstrapReport)> {
    init_tracing();
    let registry = Arc::new(InMemoryDefinitionRegistry::new());
    for seed in seed_types {
        let name = bootstrap_common::NamingConventions::component_name(seed);
        registry
            .register_definition(&name, ComponentDefinition::new(&name, *seed))
            .await?;
    }
    let ctx = Arc::new(EvaluationContext::new(
        Arc::new(env),
        registry.clone(),
        Arc::new(universe.build()),
    ));
    let report = BootstrapOrchestrator::new(ctx).run().await?;
    Ok((registry, report))
}

async fn bootstrap(
    universe: TypeUniverseBuilder,
    seed_types: &[&str],
) -> BootstrapResult<(Arc<InMemoryDefinitionRegistry>, BootstrapReport)> {
    bootstrap_with_env(universe, StaticEnvironment::new(), seed_types).await
}

#[tokio::test]
async fn test_scan_with_factory_method_scenario() -> anyhow::Result<()> {
    // Config 扫描 app.services(含组件 ServiceA 与无标记的 Helper),
    // 并声明返回 Cache 的工厂方法 cache()
    let universe = InMemoryTypeUniverse::builder()
        .with_type(
            configuration("app.config.Config")
                .with_marker(Marker::ComponentScan(ScanDirective::of_packages([
                    "app.services",
                ])))
                .with_method(
                    MethodMeta::new("cache", ReturnKind::Type("app.Cache".to_string()))
                        .with_marker(factory_marker()),
                ),
        )
        .with_type(component("app.services.ServiceA"))
        .with_type(TypeMeta::class("app.services.Helper"));

    let (registry, report) = bootstrap(universe, &["app.config.Config"]).await?;

    assert_eq!(report.registered.len(), 2);
    let names = registry.definition_names().await;
    assert!(names.contains(&"serviceA".to_string()));
    assert!(names.contains(&"cache".to_string()));
    assert!(!names.iter().any(|n| n.to_lowercase().contains("helper")));

    let cache = registry.get_definition("cache").await.unwrap();
    assert_eq!(cache.scope, ScopeDescriptor::Singleton);
    assert!(cache.is_factory_produced());
    Ok(())
}

#[tokio::test]
async fn test_scanning_is_idempotent_across_units() -> anyhow::Result<()> {
    // 两个配置单元扫描同一个包, 结果集不出现重复定义
    let universe = InMemoryTypeUniverse::builder()
        .with_type(configuration("app.config.First").with_marker(Marker::ComponentScan(
            ScanDirective::of_packages(["app.services"]),
        )))
        .with_type(configuration("app.config.Second").with_marker(Marker::ComponentScan(
            ScanDirective::of_packages(["app.services"]),
        )))
        .with_type(component("app.services.ServiceA"));

    let (registry, _) = bootstrap(universe, &["app.config.First", "app.config.Second"]).await?;

    let names = registry.definition_names().await;
    let count = names.iter().filter(|n| n.as_str() == "serviceA").count();
    assert_eq!(count, 1);
    assert!(!names.iter().any(|n| n.contains("app.services.serviceA")));
    Ok(())
}

#[tokio::test]
async fn test_mutual_imports_tolerated_by_omission() -> anyhow::Result<()> {
    // A 导入 B, B 导入 A: 双方各解析一次, 双方的贡献都进入结果集
    let universe = InMemoryTypeUniverse::builder()
        .with_type(
            configuration("app.config.A")
                .with_marker(Marker::Import {
                    refs: vec![ImportRef::Type {
                        name: "app.config.B".to_string(),
                    }],
                })
                .with_method(
                    MethodMeta::new("alpha", ReturnKind::Type("app.Alpha".to_string()))
                        .with_marker(factory_marker()),
                ),
        )
        .with_type(
            configuration("app.config.B")
                .with_marker(Marker::Import {
                    refs: vec![ImportRef::Type {
                        name: "app.config.A".to_string(),
                    }],
                })
                .with_method(
                    MethodMeta::new("beta", ReturnKind::Type("app.Beta".to_string()))
                        .with_marker(factory_marker()),
                ),
        );

    let (registry, report) = bootstrap(universe, &["app.config.A"]).await?;

    let names = registry.definition_names().await;
    assert!(names.contains(&"alpha".to_string()));
    assert!(names.contains(&"beta".to_string()));
    assert_eq!(report.registered.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_disabled_import_wins_over_passing_predicate() -> anyhow::Result<()> {
    // ServiceA 自身条件全部通过, 但命中禁用导入规则, 仍被排除
    let universe = InMemoryTypeUniverse::builder()
        .with_type(
            configuration("app.config.Config")
                .with_marker(Marker::Import {
                    refs: vec![ImportRef::Disabled {
                        name: "app.services.ServiceA".to_string(),
                    }],
                })
                .with_marker(Marker::ComponentScan(ScanDirective::of_packages([
                    "app.services",
                ]))),
        )
        .with_type(
            component("app.services.ServiceA").with_marker(Marker::Conditional {
                conditions: vec![ConditionKey::new("always")],
            }),
        )
        .with_type(component("app.services.ServiceB"));

    let (registry, report) = bootstrap(universe, &["app.config.Config"]).await?;

    let names = registry.definition_names().await;
    assert!(!names.contains(&"serviceA".to_string()));
    assert!(names.contains(&"serviceB".to_string()));
    assert_eq!(report.excluded_disabled, 1);
    Ok(())
}

#[tokio::test]
async fn test_disabled_package_excludes_whole_package() -> anyhow::Result<()> {
    let universe = InMemoryTypeUniverse::builder()
        .with_type(
            configuration("app.config.Config")
                .with_marker(Marker::Import {
                    refs: vec![ImportRef::Disabled {
                        name: "app.legacy".to_string(),
                    }],
                })
                .with_marker(Marker::ComponentScan(ScanDirective::of_packages([
                    "app.legacy",
                    "app.services",
                ]))),
        )
        .with_type(component("app.legacy.OldService"))
        .with_type(component("app.services.ServiceA"));

    let (registry, _) = bootstrap(universe, &["app.config.Config"]).await?;

    let names = registry.definition_names().await;
    assert!(!names.contains(&"oldService".to_string()));
    assert!(names.contains(&"serviceA".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_proxy_policy_forces_factory_scope_both_ways() -> anyhow::Result<()> {
    let proxied = InMemoryTypeUniverse::builder().with_type(
        configuration("app.config.Proxied").with_method(
            MethodMeta::new("cache", ReturnKind::Type("app.Cache".to_string()))
                .with_marker(factory_marker())
                .with_marker(Marker::Scope {
                    scope: ScopeDescriptor::Prototype,
                }),
        ),
    );
    let (registry, _) = bootstrap(proxied, &["app.config.Proxied"]).await?;
    assert_eq!(
        registry.get_definition("cache").await.unwrap().scope,
        ScopeDescriptor::Singleton
    );

    let unproxied = InMemoryTypeUniverse::builder().with_type(
        TypeMeta::class("app.config.Unproxied")
            .with_marker(Marker::Configuration {
                auto_activate: false,
                proxy_unit_methods: false,
            })
            .with_method(
                MethodMeta::new("cache", ReturnKind::Type("app.Cache".to_string()))
                    .with_marker(factory_marker())
                    .with_marker(Marker::Scope {
                        scope: ScopeDescriptor::Singleton,
                    }),
            ),
    );
    let (registry, _) = bootstrap(unproxied, &["app.config.Unproxied"]).await?;
    assert_eq!(
        registry.get_definition("cache").await.unwrap().scope,
        ScopeDescriptor::Prototype
    );
    Ok(())
}

#[tokio::test]
async fn test_property_condition_excludes_widget_from_names() -> anyhow::Result<()> {
    // 环境未设置 feature.enabled 且 match_if_missing=false:
    // widget 结构上可解析, 但在最终注册阶段被排除
    let universe = InMemoryTypeUniverse::builder().with_type(
        configuration("app.config.Config").with_method(
            MethodMeta::new("widget", ReturnKind::Type("app.Widget".to_string()))
                .with_marker(factory_marker())
                .with_marker(Marker::PropertyCondition {
                    names: vec!["feature.enabled".to_string()],
                    having_value: Some("true".to_string()),
                    match_if_missing: false,
                }),
        ),
    );

    let (registry, report) = bootstrap(universe, &["app.config.Config"]).await?;
    assert!(!registry
        .definition_names()
        .await
        .contains(&"widget".to_string()));
    assert_eq!(report.excluded_by_condition, 1);

    // 属性设置后同样的图注册成功
    let universe = InMemoryTypeUniverse::builder().with_type(
        configuration("app.config.Config").with_method(
            MethodMeta::new("widget", ReturnKind::Type("app.Widget".to_string()))
                .with_marker(factory_marker())
                .with_marker(Marker::PropertyCondition {
                    names: vec!["feature.enabled".to_string()],
                    having_value: Some("true".to_string()),
                    match_if_missing: false,
                }),
        ),
    );
    let env = StaticEnvironment::new().with_property("feature.enabled", "true");
    let (registry, _) = bootstrap_with_env(universe, env, &["app.config.Config"]).await?;
    assert!(registry
        .definition_names()
        .await
        .contains(&"widget".to_string()));
    Ok(())
}

/// 记录评估次数的条件
struct CountingCondition {
    result: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Condition for CountingCondition {
    async fn matches(&self, _ctx: &EvaluationContext) -> BootstrapResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result)
    }

    fn key(&self) -> &str {
        "counting"
    }
}

#[tokio::test]
async fn test_condition_chain_is_fail_fast_in_order() -> anyhow::Result<()> {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let universe = InMemoryTypeUniverse::builder()
        .with_condition(
            "gate.first",
            Arc::new(CountingCondition {
                result: false,
                calls: first.clone(),
            }),
        )
        .with_condition(
            "gate.second",
            Arc::new(CountingCondition {
                result: true,
                calls: second.clone(),
            }),
        )
        .with_type(configuration("app.config.Config").with_marker(Marker::ComponentScan(
            ScanDirective::of_packages(["app.services"]),
        )))
        .with_type(
            component("app.services.Gated").with_marker(Marker::Conditional {
                conditions: vec![ConditionKey::new("gate.first"), ConditionKey::new("gate.second")],
            }),
        );

    let (registry, _) = bootstrap(universe, &["app.config.Config"]).await?;

    assert!(!registry
        .definition_names()
        .await
        .contains(&"gated".to_string()));
    assert_eq!(first.load(Ordering::SeqCst), 1);
    // 首个 false 之后的条件不再评估
    assert_eq!(second.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_unresolvable_condition_aborts_run() {
    let universe = InMemoryTypeUniverse::builder()
        .with_type(configuration("app.config.Config").with_marker(Marker::ComponentScan(
            ScanDirective::of_packages(["app.services"]),
        )))
        .with_type(
            component("app.services.Broken").with_marker(Marker::Conditional {
                conditions: vec![ConditionKey::new("no.such.Condition")],
            }),
        );

    let err = bootstrap(universe, &["app.config.Config"]).await.unwrap_err();
    match err {
        BootstrapError::ConditionInstantiation { condition, candidate } => {
            assert_eq!(condition, "no.such.Condition");
            assert_eq!(candidate, "app.services.Broken");
        }
        other => panic!("意外的错误: {:?}", other),
    }
}

/// 根据环境属性决定导入目标的选择器
struct TogglingSelector;

#[async_trait]
impl ImportSelector for TogglingSelector {
    async fn select_imports(
        &self,
        ctx: &EvaluationContext,
        _importing: &TypeMeta,
    ) -> BootstrapResult<Vec<ImportRef>> {
        let enabled = ctx
            .environment()
            .get_property("extras.enabled")
            .map(|v| v == "true")
            .unwrap_or(false);
        if enabled {
            Ok(vec![ImportRef::Type {
                name: "app.config.Extras".to_string(),
            }])
        } else {
            Ok(vec![ImportRef::Disabled {
                name: "app.extras".to_string(),
            }])
        }
    }

    fn name(&self) -> &str {
        "toggling"
    }
}

#[tokio::test]
async fn test_selector_driven_import() -> anyhow::Result<()> {
    let universe = InMemoryTypeUniverse::builder()
        .with_selector("app.config.ExtrasSelector", Arc::new(TogglingSelector))
        .with_type(configuration("app.config.Config").with_marker(Marker::Import {
            refs: vec![ImportRef::Type {
                name: "app.config.ExtrasSelector".to_string(),
            }],
        }))
        .with_type(
            configuration("app.config.Extras").with_method(
                MethodMeta::new("extra", ReturnKind::Type("app.extras.Extra".to_string()))
                    .with_marker(factory_marker()),
            ),
        );

    let env = StaticEnvironment::new().with_property("extras.enabled", "true");
    let (registry, _) = bootstrap_with_env(universe, env, &["app.config.Config"]).await?;
    assert!(registry
        .definition_names()
        .await
        .contains(&"extra".to_string()));
    Ok(())
}

/// 固定返回同一导入目标的选择器
struct FixedSelector;

#[async_trait]
impl ImportSelector for FixedSelector {
    async fn select_imports(
        &self,
        _ctx: &EvaluationContext,
        _importing: &TypeMeta,
    ) -> BootstrapResult<Vec<ImportRef>> {
        Ok(vec![ImportRef::Type {
            name: "app.config.SubConfig".to_string(),
        }])
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

#[tokio::test]
async fn test_selector_discovered_unit_contributes_filters() -> anyhow::Result<()> {
    // SubConfig 仅经选择器进入配置图, 其扫描指令上的排除过滤器
    // 仍须在扫描前生效
    let universe = InMemoryTypeUniverse::builder()
        .with_selector("app.config.SubSelector", Arc::new(FixedSelector))
        .with_type(configuration("app.config.Config").with_marker(Marker::Import {
            refs: vec![ImportRef::Type {
                name: "app.config.SubSelector".to_string(),
            }],
        }))
        .with_type(configuration("app.config.SubConfig").with_marker(Marker::ComponentScan(
            ScanDirective::of_packages(["app.services"]).with_exclude_filter(FilterSpec::Pattern {
                regex: "Legacy".to_string(),
            }),
        )))
        .with_type(component("app.services.ServiceA"))
        .with_type(component("app.services.LegacyService"));

    let (registry, _) = bootstrap(universe, &["app.config.Config"]).await?;

    let names = registry.definition_names().await;
    assert!(names.contains(&"serviceA".to_string()));
    assert!(
        !names.contains(&"legacyService".to_string()),
        "排除过滤器未生效: {:?}",
        names
    );
    Ok(())
}

#[tokio::test]
async fn test_auto_activating_config_survives_scan_filters() -> anyhow::Result<()> {
    // 扫描过滤器排除了 AutoConfig 本身, 但自动激活配置仍须入队,
    // 其工厂方法定义进入最终结果集
    let universe = InMemoryTypeUniverse::builder()
        .with_type(configuration("app.config.Config").with_marker(Marker::ComponentScan(
            ScanDirective::of_packages(["app.auto"]).with_exclude_filter(FilterSpec::Pattern {
                regex: "Config$".to_string(),
            }),
        )))
        .with_type(
            TypeMeta::class("app.auto.AutoConfig")
                .with_marker(Marker::Configuration {
                    auto_activate: true,
                    proxy_unit_methods: true,
                })
                .with_method(
                    MethodMeta::new("autoThing", ReturnKind::Type("app.auto.Thing".to_string()))
                        .with_marker(factory_marker()),
                ),
        )
        .with_type(component("app.auto.WorkerService"));

    let (registry, _) = bootstrap(universe, &["app.config.Config"]).await?;

    let names = registry.definition_names().await;
    assert!(names.contains(&"workerService".to_string()));
    assert!(
        names.contains(&"autoThing".to_string()),
        "自动激活配置的工厂方法未产出定义: {:?}",
        names
    );
    Ok(())
}

#[tokio::test]
async fn test_scanned_collision_is_namespaced_with_unit_name() -> anyhow::Result<()> {
    // 两个单元扫描不同的包, 各命中一个短名相同的组件:
    // 后注册者以所属配置单元名称为前缀, 而非声明包名
    let universe = InMemoryTypeUniverse::builder()
        .with_type(
            configuration("app.config.AlphaConfig")
                .with_marker(Marker::ComponentScan(ScanDirective::of_packages([
                    "app.alpha",
                ])))
                .with_marker(Marker::Import {
                    refs: vec![ImportRef::Type {
                        name: "app.config.BetaConfig".to_string(),
                    }],
                }),
        )
        .with_type(configuration("app.config.BetaConfig").with_marker(Marker::ComponentScan(
            ScanDirective::of_packages(["app.beta"]),
        )))
        .with_type(component("app.alpha.Worker"))
        .with_type(component("app.beta.Worker"));

    let (registry, report) = bootstrap(universe, &["app.config.AlphaConfig"]).await?;

    let names = registry.definition_names().await;
    assert_eq!(report.registered.len(), 2);
    assert!(names.contains(&"worker".to_string()));
    assert!(
        names.contains(&"betaConfig.worker".to_string()),
        "冲突名称应以配置单元名称为前缀: {:?}",
        names
    );
    Ok(())
}

#[tokio::test]
async fn test_profile_restricted_unit_is_inactive() -> anyhow::Result<()> {
    let universe = InMemoryTypeUniverse::builder()
        .with_type(
            configuration("app.config.ProdConfig")
                .with_marker(Marker::Profile {
                    profiles: vec!["prod".to_string()],
                })
                .with_method(
                    MethodMeta::new("monitor", ReturnKind::Type("app.Monitor".to_string()))
                        .with_marker(factory_marker()),
                ),
        );

    // 激活 profile 为 dev: 单元整体不激活, 其工厂方法不产出定义
    let env = StaticEnvironment::new().with_profile("dev");
    let (registry, report) = bootstrap_with_env(universe, env, &["app.config.ProdConfig"]).await?;
    assert!(report.registered.is_empty());
    assert!(!registry
        .definition_names()
        .await
        .contains(&"monitor".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_name_collision_is_namespaced_with_unit_name() -> anyhow::Result<()> {
    // 两个单元各声明一个 cache() 工厂方法, 后解析者被命名空间化
    let universe = InMemoryTypeUniverse::builder()
        .with_type(
            configuration("app.config.First")
                .with_marker(Marker::Import {
                    refs: vec![ImportRef::Type {
                        name: "app.config.Second".to_string(),
                    }],
                })
                .with_method(
                    MethodMeta::new("cache", ReturnKind::Type("app.FirstCache".to_string()))
                        .with_marker(factory_marker()),
                ),
        )
        .with_type(
            configuration("app.config.Second").with_method(
                MethodMeta::new("cache", ReturnKind::Type("app.SecondCache".to_string()))
                    .with_marker(factory_marker()),
            ),
        );

    let (registry, report) = bootstrap(universe, &["app.config.First"]).await?;

    let names = registry.definition_names().await;
    assert_eq!(report.registered.len(), 2);
    assert!(names.contains(&"cache".to_string()));
    assert!(
        names.contains(&"first.cache".to_string()) || names.contains(&"second.cache".to_string()),
        "冲突名称应被所属单元名称命名空间化: {:?}",
        names
    );
    Ok(())
}

/// 评估时登记忽略依赖副作用后返回 false 的条件
struct SideEffectingCondition;

#[async_trait]
impl Condition for SideEffectingCondition {
    async fn matches(&self, ctx: &EvaluationContext) -> BootstrapResult<bool> {
        ctx.ignore_dependency("app.native.Binding");
        Ok(false)
    }

    fn key(&self) -> &str {
        "side_effecting"
    }
}

#[tokio::test]
async fn test_condition_side_effects_survive_failure_path() -> anyhow::Result<()> {
    init_tracing();
    let universe = InMemoryTypeUniverse::builder()
        .with_condition("side_effecting", Arc::new(SideEffectingCondition))
        .with_type(configuration("app.config.Config").with_marker(Marker::ComponentScan(
            ScanDirective::of_packages(["app.services"]),
        )))
        .with_type(
            component("app.services.Gated").with_marker(Marker::Conditional {
                conditions: vec![ConditionKey::new("side_effecting")],
            }),
        );

    let registry = Arc::new(InMemoryDefinitionRegistry::new());
    registry
        .register_definition(
            "config",
            ComponentDefinition::new("config", "app.config.Config"),
        )
        .await?;
    let ctx = Arc::new(EvaluationContext::new(
        Arc::new(StaticEnvironment::new()),
        registry.clone(),
        Arc::new(universe.build()),
    ));
    BootstrapOrchestrator::new(ctx.clone()).run().await?;

    // 候选被排除, 但失败路径上登记的副作用保留
    assert!(!registry
        .definition_names()
        .await
        .contains(&"gated".to_string()));
    assert!(ctx.is_dependency_ignored("app.native.Binding"));
    Ok(())
}

/// 要求宿主运行时版本已知的条件
struct KnownRuntimeCondition;

#[async_trait]
impl Condition for KnownRuntimeCondition {
    async fn matches(&self, ctx: &EvaluationContext) -> BootstrapResult<bool> {
        Ok(ctx.runtime().runtime_version() != "unknown")
    }

    fn key(&self) -> &str {
        "known_runtime"
    }
}

#[tokio::test]
async fn test_runtime_version_gated_condition() -> anyhow::Result<()> {
    init_tracing();
    let build_universe = || {
        InMemoryTypeUniverse::builder()
            .with_condition("known_runtime", Arc::new(KnownRuntimeCondition))
            .with_type(configuration("app.config.Config").with_marker(Marker::ComponentScan(
                ScanDirective::of_packages(["app.services"]),
            )))
            .with_type(
                component("app.services.Versioned").with_marker(Marker::Conditional {
                    conditions: vec![ConditionKey::new("known_runtime")],
                }),
            )
            .build()
    };

    let bootstrap_with_runtime = |universe: InMemoryTypeUniverse, runtime| async move {
        let registry = Arc::new(InMemoryDefinitionRegistry::new());
        registry
            .register_definition(
                "config",
                ComponentDefinition::new("config", "app.config.Config"),
            )
            .await?;
        let mut ctx = EvaluationContext::new(
            Arc::new(StaticEnvironment::new()),
            registry.clone(),
            Arc::new(universe),
        );
        if let Some(provider) = runtime {
            ctx = ctx.with_runtime(provider);
        }
        BootstrapOrchestrator::new(Arc::new(ctx)).run().await?;
        anyhow::Ok(registry.definition_names().await)
    };

    // 默认运行时版本为 unknown, 条件不成立
    let names = bootstrap_with_runtime(build_universe(), None).await?;
    assert!(!names.contains(&"versioned".to_string()));

    let provider: Arc<dyn bootstrap_abstractions::RuntimeVersionProvider> =
        Arc::new(bootstrap_abstractions::StaticRuntimeVersion::new("1.75.0"));
    let names = bootstrap_with_runtime(build_universe(), Some(provider)).await?;
    assert!(names.contains(&"versioned".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_imported_plain_type_discovers_siblings_via_scan() -> anyhow::Result<()> {
    // 导入普通类型时, 其所属包交给扫描器, 兄弟组件一并被发现
    let universe = InMemoryTypeUniverse::builder()
        .with_type(configuration("app.config.Config").with_marker(Marker::Import {
            refs: vec![ImportRef::Type {
                name: "app.services.ServiceA".to_string(),
            }],
        }))
        .with_type(component("app.services.ServiceA"))
        .with_type(component("app.services.ServiceB"));

    let (registry, _) = bootstrap(universe, &["app.config.Config"]).await?;

    let names = registry.definition_names().await;
    assert!(names.contains(&"serviceA".to_string()));
    assert!(names.contains(&"serviceB".to_string()));
    Ok(())
}
