//! 谓词评估器
//!
//! 对候选类型或方法上声明的条件标记做快速失败的 AND 组合评估。
//! Profile 限制最先检查并在不匹配时短路；命名条件按条件键先查
//! 内建表，再回退到类型内省提供者的实例化能力，两者都查不到时
//! 视为致命配置错误。

use async_trait::async_trait;
use bootstrap_abstractions::{Condition, EvaluationContext};
use bootstrap_common::{BootstrapError, BootstrapResult, Marker};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// 恒真条件
struct AlwaysCondition;

#[async_trait]
impl Condition for AlwaysCondition {
    async fn matches(&self, _ctx: &EvaluationContext) -> BootstrapResult<bool> {
        Ok(true)
    }

    fn key(&self) -> &str {
        "always"
    }
}

/// 恒假条件
struct NeverCondition;

#[async_trait]
impl Condition for NeverCondition {
    async fn matches(&self, _ctx: &EvaluationContext) -> BootstrapResult<bool> {
        Ok(false)
    }

    fn key(&self) -> &str {
        "never"
    }
}

/// 指定名称缺失时成立的条件
///
/// 候选定义尚不存在（已注册与在途都算存在）时成立
pub struct OnMissingDefinitionCondition {
    name: String,
}

impl OnMissingDefinitionCondition {
    /// 创建针对指定注册名称的条件
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Condition for OnMissingDefinitionCondition {
    async fn matches(&self, ctx: &EvaluationContext) -> BootstrapResult<bool> {
        Ok(!ctx.sees_definition(&self.name).await)
    }

    fn key(&self) -> &str {
        "on_missing_definition"
    }
}

/// 内建条件表，按稳定字符串键查找
static BUILTIN_CONDITIONS: Lazy<HashMap<&'static str, Arc<dyn Condition>>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, Arc<dyn Condition>> = HashMap::new();
    table.insert("always", Arc::new(AlwaysCondition));
    table.insert("never", Arc::new(NeverCondition));
    table
});

/// 谓词评估器
#[derive(Debug, Default)]
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估候选（类型或方法）的标记列表，决定是否纳入
    ///
    /// `candidate` 仅用于日志与错误信息。条件在评估过程中登记的
    /// 副作用即使在失败路径上也保留。
    pub async fn should_include(
        ctx: &EvaluationContext,
        markers: &[Marker],
        candidate: &str,
    ) -> BootstrapResult<bool> {
        // Profile 限制最先检查，不匹配时短路
        for marker in markers {
            if let Marker::Profile { profiles } = marker {
                if !profiles.is_empty() && !ctx.environment().accepts_profiles(profiles) {
                    debug!(
                        "Profile 限制不匹配, 排除候选: candidate={}, profiles={:?}",
                        candidate, profiles
                    );
                    return Ok(false);
                }
            }
        }

        // 其余条件标记按声明顺序评估，首个 false 即停止
        for marker in markers {
            match marker {
                Marker::Conditional { conditions } => {
                    for key in conditions {
                        let condition = Self::resolve(ctx, key.as_str(), candidate)?;
                        if !condition.matches(ctx).await? {
                            trace!(
                                "命名条件不成立: candidate={}, condition={}",
                                candidate,
                                key
                            );
                            return Ok(false);
                        }
                    }
                }
                Marker::PropertyCondition {
                    names,
                    having_value,
                    match_if_missing,
                } => {
                    if !Self::property_matches(ctx, names, having_value.as_deref(), *match_if_missing)
                    {
                        trace!(
                            "属性条件不成立: candidate={}, names={:?}",
                            candidate,
                            names
                        );
                        return Ok(false);
                    }
                }
                Marker::TypePresence { required, missing } => {
                    if !Self::type_presence_matches(ctx, required, missing) {
                        trace!("类型存在性条件不成立: candidate={}", candidate);
                        return Ok(false);
                    }
                }
                _ => {}
            }
        }
        Ok(true)
    }

    /// 解析条件键为条件实例：先查内建表，再回退到类型内省提供者
    fn resolve(
        ctx: &EvaluationContext,
        key: &str,
        candidate: &str,
    ) -> BootstrapResult<Arc<dyn Condition>> {
        if let Some(builtin) = BUILTIN_CONDITIONS.get(key) {
            return Ok(builtin.clone());
        }
        ctx.universe()
            .instantiate_condition(key)
            .ok_or_else(|| BootstrapError::condition_instantiation(key, candidate))
    }

    /// 属性匹配：所有名称都必须通过
    ///
    /// 属性缺失时由 `match_if_missing` 决定；存在且指定了期望值时
    /// 比较相等；未指定期望值时除 "false" 外的任何值都算匹配
    fn property_matches(
        ctx: &EvaluationContext,
        names: &[String],
        having_value: Option<&str>,
        match_if_missing: bool,
    ) -> bool {
        names.iter().all(|name| {
            match ctx.environment().get_property(name) {
                Some(value) => match having_value {
                    Some(expected) => value == expected,
                    None => value != "false",
                },
                None => match_if_missing,
            }
        })
    }

    /// 类型存在性：required 全部存在且 missing 全部缺失
    fn type_presence_matches(
        ctx: &EvaluationContext,
        required: &[String],
        missing: &[String],
    ) -> bool {
        required.iter().all(|t| ctx.universe().contains_type(t))
            && missing.iter().all(|t| !ctx.universe().contains_type(t))
    }
}
