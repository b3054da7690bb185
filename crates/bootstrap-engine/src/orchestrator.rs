//! 引导编排器
//!
//! 驱动整条发现与条件纳入流水线的状态机：
//! 种子收集 → 过滤器预收集 → 递归展开 → 方法解析 → 最终注册 → 完成。
//! 所有可变追踪状态都限定在一次 [`BootstrapRun`] 内，运行结束即清空。

use crate::config_unit::{ConfigurationUnit, ConfigurationUnitBuilder};
use crate::conditions::ConditionEvaluator;
use crate::factory_method::FactoryMethodResolver;
use crate::filters::FilterSet;
use crate::imports::ImportResolver;
use crate::run::BootstrapRun;
use crate::scanner::PackageScanner;
use bootstrap_abstractions::EvaluationContext;
use bootstrap_common::{
    BootstrapResult, ComponentDefinition, ImportRef, Marker, NamingConventions, NamingPolicy,
    TypeMeta,
};
use chrono::{DateTime, Utc};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, trace};
use uuid::Uuid;

/// 一次引导运行的结果摘要
#[derive(Debug)]
pub struct BootstrapReport {
    /// 运行标识
    pub run_id: Uuid,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 结束时间
    pub finished_at: DateTime<Utc>,
    /// 注册成功的定义名称，按注册顺序
    pub registered: Vec<String>,
    /// 因禁用导入规则排除的定义数量
    pub excluded_disabled: usize,
    /// 最终注册阶段因条件评估排除的定义数量
    pub excluded_by_condition: usize,
}

/// 引导编排器
///
/// 可复用：每次调用 [`run`](Self::run) 创建全新的运行状态，
/// 上一次运行的追踪集合不会泄漏进来。
pub struct BootstrapOrchestrator {
    ctx: Arc<EvaluationContext>,
}

impl BootstrapOrchestrator {
    /// 创建编排器
    pub fn new(ctx: Arc<EvaluationContext>) -> Self {
        Self { ctx }
    }

    /// 执行一次完整的引导解析运行
    pub async fn run(&self) -> BootstrapResult<BootstrapReport> {
        let run = BootstrapRun::new();
        info!("引导运行开始: run_id={}", run.id);

        // SeedCandidates: 已注册定义中符合配置单元候选的类型
        let seeds = self.seed_candidates().await;
        debug!("种子候选收集完成: count={}", seeds.len());

        // FilterDiscoveryPass: 非变更遍历, 预收集配置图各处的过滤器
        let (mut filters, mut absorbed) = self.discover_filters(&seeds)?;

        // RecursiveExpansionPass: 工作队列循环
        let (units, mut definitions) = self
            .expand(&run, &seeds, &mut filters, &mut absorbed)
            .await?;
        debug!(
            "递归展开完成: units={}, definitions={}",
            units.len(),
            definitions.len()
        );

        // MethodResolution: 工厂方法转换, 跳过被禁用的单元
        let method_definitions = self.resolve_methods(&run, &units).await;
        definitions.extend(method_definitions);

        // FinalRegistration
        let report = self.register(&run, definitions).await?;

        // Done: 清空全部运行内追踪状态
        run.clear();
        info!(
            "引导运行完成: run_id={}, registered={}, excluded_disabled={}, excluded_by_condition={}",
            report.run_id,
            report.registered.len(),
            report.excluded_disabled,
            report.excluded_by_condition
        );
        Ok(report)
    }

    /// 收集已注册定义中符合配置单元候选的类型元数据
    async fn seed_candidates(&self) -> Vec<Arc<TypeMeta>> {
        let mut seeds = Vec::new();
        for name in self.ctx.registry().definition_names().await {
            let Some(definition) = self.ctx.registry().get_definition(&name).await else {
                continue;
            };
            if let Some(meta) = self.ctx.universe().get_type(&definition.declaring_type) {
                if ConfigurationUnit::is_candidate(&meta) {
                    seeds.push(meta);
                }
            }
        }
        seeds
    }

    /// 过滤器预收集
    ///
    /// 沿导入边递归遍历配置图但不产生任何定义，把各处声明的
    /// 包含/排除过滤器汇入单一集合，后续扫描使用这个并集。
    /// 返回已吸收过滤器的类型名集合：经选择器或扫描才进入图的
    /// 配置单元不在其中，展开阶段补收其过滤器
    fn discover_filters(
        &self,
        seeds: &[Arc<TypeMeta>],
    ) -> BootstrapResult<(FilterSet, HashSet<String>)> {
        let mut filters = FilterSet::new();
        let mut visited = HashSet::new();
        for seed in seeds {
            self.collect_filters(seed, &mut visited, &mut filters)?;
        }
        Ok((filters, visited))
    }

    fn collect_filters(
        &self,
        meta: &TypeMeta,
        visited: &mut HashSet<String>,
        filters: &mut FilterSet,
    ) -> BootstrapResult<()> {
        if !visited.insert(meta.qualified_name.clone()) {
            return Ok(());
        }
        for directive in meta.scan_directives() {
            filters.absorb_directive(directive)?;
        }
        for reference in meta.import_refs() {
            if let ImportRef::Type { name } = reference {
                if let Some(next) = self.ctx.universe().get_type(name) {
                    self.collect_filters(&next, visited, filters)?;
                }
            }
        }
        Ok(())
    }

    /// 递归展开工作队列
    ///
    /// 返回处理完的配置单元与累积的非配置定义。新发现的定义若
    /// 自身是配置单元候选则构建并入队，不进入结果集。
    async fn expand(
        &self,
        run: &BootstrapRun,
        seeds: &[Arc<TypeMeta>],
        filters: &mut FilterSet,
        absorbed: &mut HashSet<String>,
    ) -> BootstrapResult<(Vec<ConfigurationUnit>, Vec<ComponentDefinition>)> {
        let mut queue: VecDeque<ConfigurationUnit> = VecDeque::new();
        for seed in seeds {
            if let Some(unit) =
                ConfigurationUnitBuilder::build(&self.ctx, run, seed.clone()).await?
            {
                queue.push_back(unit);
            }
        }

        let mut units = Vec::new();
        let mut definitions = Vec::new();
        while let Some(unit) = queue.pop_front() {
            trace!("处理配置单元: name={}", unit.name());

            // 预收集遍历不到的单元（选择器产出、扫描命中）在此补收过滤器
            if absorbed.insert(unit.qualified_name().to_string()) {
                for directive in unit.scan_directives() {
                    filters.absorb_directive(directive)?;
                }
            }

            let outcome = ImportResolver::resolve(&self.ctx, run, &unit.meta).await?;
            for meta in outcome.new_config_units {
                if let Some(imported) =
                    ConfigurationUnitBuilder::build(&self.ctx, run, meta).await?
                {
                    queue.push_back(imported);
                }
            }
            for package in outcome.scan_targets {
                let scanned = PackageScanner::scan(
                    &self.ctx,
                    run,
                    &package,
                    filters,
                    &unit.scope_policy,
                    &NamingPolicy::default(),
                )
                .await?;
                self.classify(run, &unit, scanned, &mut queue, &mut definitions)
                    .await?;
            }

            for directive in unit.scan_directives() {
                let scope_policy = directive
                    .scope_policy
                    .clone()
                    .unwrap_or_else(|| unit.scope_policy.clone());
                let naming_policy = directive.naming_policy.unwrap_or_default();
                for package in &directive.packages {
                    let scanned = PackageScanner::scan(
                        &self.ctx,
                        run,
                        package,
                        filters,
                        &scope_policy,
                        &naming_policy,
                    )
                    .await?;
                    self.classify(run, &unit, scanned, &mut queue, &mut definitions)
                        .await?;
                }
            }

            units.push(unit);
        }
        Ok((units, definitions))
    }

    /// 把新产出的定义分流：配置单元候选入队递归, 其余累积进结果集
    async fn classify(
        &self,
        run: &BootstrapRun,
        unit: &ConfigurationUnit,
        scanned: Vec<ComponentDefinition>,
        queue: &mut VecDeque<ConfigurationUnit>,
        definitions: &mut Vec<ComponentDefinition>,
    ) -> BootstrapResult<()> {
        for mut definition in scanned {
            match self.ctx.universe().get_type(&definition.declaring_type) {
                Some(meta) if ConfigurationUnit::is_candidate(&meta) => {
                    // 自动激活配置与被扫描到的配置同样入队递归
                    if let Some(imported) =
                        ConfigurationUnitBuilder::build(&self.ctx, run, meta).await?
                    {
                        queue.push_back(imported);
                    }
                }
                _ => {
                    definition.owning_unit = Some(unit.name().to_string());
                    definitions.push(definition);
                }
            }
        }
        Ok(())
    }

    /// 工厂方法转换阶段
    async fn resolve_methods(
        &self,
        run: &BootstrapRun,
        units: &[ConfigurationUnit],
    ) -> Vec<ComponentDefinition> {
        let mut definitions = Vec::new();
        for unit in units {
            if run.is_disabled(unit.qualified_name()) {
                debug!("单元命中禁用导入, 跳过方法解析: unit={}", unit.name());
                continue;
            }
            for method in unit.factory_methods() {
                if let Some(definition) =
                    FactoryMethodResolver::resolve(&self.ctx, run, unit, method).await
                {
                    self.ctx.add_pending_definition(definition.clone());
                    definitions.push(definition);
                }
            }
        }
        definitions
    }

    /// 最终注册阶段
    ///
    /// 确定性排序, 过滤禁用导入, 对每个定义重新做一次条件评估
    /// （条件此刻能看到展开期间加入的兄弟候选）, 注册存活者。
    /// 工厂方法产出的定义按方法自身的条件列表评估。
    async fn register(
        &self,
        run: &BootstrapRun,
        mut definitions: Vec<ComponentDefinition>,
    ) -> BootstrapResult<BootstrapReport> {
        definitions.sort_by_key(|d| d.ordering_key());

        let mut registered = Vec::new();
        let mut excluded_disabled = 0;
        let mut excluded_by_condition = 0;
        for mut definition in definitions {
            if run.is_disabled(&definition.declaring_type) {
                trace!(
                    "命中禁用导入, 排除: name={}, type={}",
                    definition.name,
                    definition.declaring_type
                );
                excluded_disabled += 1;
                continue;
            }

            let markers = self.markers_for(&definition);
            if !ConditionEvaluator::should_include(&self.ctx, &markers, &definition.declaring_type)
                .await?
            {
                debug!("最终注册条件评估未通过: name={}", definition.name);
                excluded_by_condition += 1;
                continue;
            }

            if self.ctx.registry().contains_definition(&definition.name).await {
                // 命名空间前缀取发现该定义的配置单元名, 无单元归属时退回声明包名
                let prefix = definition
                    .factory_method
                    .as_ref()
                    .map(|fm| fm.config_unit_name.clone())
                    .or_else(|| definition.owning_unit.clone())
                    .unwrap_or_else(|| definition.package().to_string());
                definition.name = NamingConventions::namespaced(&prefix, &definition.name);
            }

            let name = definition.name.clone();
            self.ctx
                .registry()
                .register_definition(&name, definition)
                .await?;
            registered.push(name);
        }

        Ok(BootstrapReport {
            run_id: run.id,
            started_at: run.started_at,
            finished_at: Utc::now(),
            registered,
            excluded_disabled,
            excluded_by_condition,
        })
    }

    /// 取定义在最终注册阶段参与评估的标记列表
    ///
    /// 工厂方法产出的定义查所属单元类型上的同名方法, 其余定义
    /// 查声明类型自身的标记
    fn markers_for(&self, definition: &ComponentDefinition) -> Vec<Marker> {
        if let Some(back_ref) = &definition.factory_method {
            if let Some(meta) = self.ctx.universe().get_type(&back_ref.declaring_type) {
                if let Some(method) = meta
                    .methods
                    .iter()
                    .find(|m| m.name == back_ref.method_name)
                {
                    return method.markers.clone();
                }
            }
            return Vec::new();
        }
        self.ctx
            .universe()
            .get_type(&definition.declaring_type)
            .map(|meta| meta.markers.clone())
            .unwrap_or_default()
    }
}
