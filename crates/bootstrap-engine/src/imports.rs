//! 导入解析器
//!
//! 处理配置单元上的导入引用：展开动态选择器、检测循环、把引用
//! 分类为新的配置单元、扫描目标或禁用规则。每个单元幂等解析一次。

use crate::config_unit::ConfigurationUnit;
use crate::run::BootstrapRun;
use bootstrap_abstractions::EvaluationContext;
use bootstrap_common::{BootstrapResult, ImportRef, NamingConventions, TypeMeta};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

/// 一次导入解析的产出
#[derive(Debug, Default)]
pub struct ImportOutcome {
    /// 识别为配置单元候选的类型，待递归处理
    pub new_config_units: Vec<Arc<TypeMeta>>,
    /// 待扫描的包名
    pub scan_targets: Vec<String>,
    /// 收集到的禁用引用
    pub disabled: Vec<String>,
}

/// 导入解析器
#[derive(Debug, Default)]
pub struct ImportResolver;

impl ImportResolver {
    /// 解析一个单元的导入引用
    ///
    /// 已解析过的单元返回空产出。处于解析栈上的目标以 trace 级
    /// 日志跳过，循环通过省略容忍而不是报错。
    pub async fn resolve(
        ctx: &EvaluationContext,
        run: &BootstrapRun,
        unit: &TypeMeta,
    ) -> BootstrapResult<ImportOutcome> {
        let mut outcome = ImportOutcome::default();
        if !run.mark_imports_resolved(&unit.qualified_name) {
            trace!("单元导入已解析过, 跳过: unit={}", unit.qualified_name);
            return Ok(outcome);
        }
        run.enter_import(&unit.qualified_name);
        let result = Self::process_refs(ctx, run, unit, &mut outcome).await;
        run.leave_import(&unit.qualified_name);
        result?;
        Ok(outcome)
    }

    async fn process_refs(
        ctx: &EvaluationContext,
        run: &BootstrapRun,
        unit: &TypeMeta,
        outcome: &mut ImportOutcome,
    ) -> BootstrapResult<()> {
        let mut worklist: VecDeque<ImportRef> =
            unit.import_refs().into_iter().cloned().collect();

        while let Some(reference) = worklist.pop_front() {
            match reference {
                ImportRef::Disabled { name } => {
                    debug!("收集禁用导入: unit={}, target={}", unit.qualified_name, name);
                    run.mark_disabled(&name);
                    outcome.disabled.push(name);
                }
                ImportRef::Package { name } => {
                    outcome.scan_targets.push(name);
                }
                ImportRef::Type { name } => {
                    if run.is_importing(&name) {
                        trace!(
                            "导入循环, 通过省略容忍: unit={}, target={}",
                            unit.qualified_name,
                            name
                        );
                        continue;
                    }
                    if run.is_converted(&name) {
                        trace!("导入目标已转换, 跳过: target={}", name);
                        continue;
                    }
                    // 动态选择器能力：展开为进一步的引用折回处理
                    if let Some(selector) = ctx.universe().instantiate_selector(&name) {
                        debug!(
                            "展开导入选择器: unit={}, selector={}",
                            unit.qualified_name,
                            selector.name()
                        );
                        for expanded in selector.select_imports(ctx, unit).await? {
                            worklist.push_back(expanded);
                        }
                        continue;
                    }
                    match ctx.universe().get_type(&name) {
                        Some(meta) if ConfigurationUnit::is_candidate(&meta) => {
                            if meta.is_auto_activating() {
                                run.mark_auto_activated(&meta.qualified_name);
                            }
                            outcome.new_config_units.push(meta);
                        }
                        _ => {
                            // 非配置类型：其所属包交给扫描器，连同兄弟类型一起发现
                            let package = NamingConventions::package_of(&name);
                            if !package.is_empty() {
                                outcome.scan_targets.push(package.to_string());
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
