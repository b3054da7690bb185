//! 类型过滤器集合
//!
//! 扫描指令中的过滤规格由这里编译为实际过滤器。排除过滤器先于
//! 包含过滤器评估；未配置包含过滤器时由默认过滤器兜底。

use bootstrap_abstractions::TypeUniverse;
use bootstrap_common::{BootstrapError, BootstrapResult, FilterSpec, MarkerKind, ScanDirective, TypeMeta};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// 调用方自定义谓词
pub type CustomPredicate = Arc<dyn Fn(&TypeMeta) -> bool + Send + Sync>;

/// 编译后的类型过滤器
#[derive(Clone)]
pub enum TypeFilter {
    /// 标记存在性
    MarkerPresence(MarkerKind),
    /// 可赋值给指定超类型
    AssignableTo(String),
    /// 限定名正则匹配
    Pattern(Regex),
    /// 调用方提供的自定义谓词
    Custom(CustomPredicate),
}

impl TypeFilter {
    /// 从可序列化的过滤规格编译
    pub fn from_spec(spec: &FilterSpec) -> BootstrapResult<Self> {
        match spec {
            FilterSpec::MarkerPresence { marker } => Ok(Self::MarkerPresence(*marker)),
            FilterSpec::AssignableTo { type_name } => Ok(Self::AssignableTo(type_name.clone())),
            FilterSpec::Pattern { regex } => {
                let compiled = Regex::new(regex).map_err(|e| BootstrapError::InvalidFilter {
                    message: format!("正则表达式无效: {}: {}", regex, e),
                })?;
                Ok(Self::Pattern(compiled))
            }
        }
    }

    /// 候选类型是否命中此过滤器
    pub fn matches(&self, meta: &TypeMeta, universe: &dyn TypeUniverse) -> bool {
        match self {
            Self::MarkerPresence(kind) => meta.has_marker(*kind),
            Self::AssignableTo(target) => universe.is_assignable(&meta.qualified_name, target),
            Self::Pattern(regex) => regex.is_match(&meta.qualified_name),
            Self::Custom(predicate) => predicate(meta),
        }
    }
}

impl fmt::Debug for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarkerPresence(kind) => write!(f, "MarkerPresence({:?})", kind),
            Self::AssignableTo(target) => write!(f, "AssignableTo({})", target),
            Self::Pattern(regex) => write!(f, "Pattern({})", regex.as_str()),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// 全局过滤器集合
///
/// 编排器在过滤器预收集阶段把配置图各处声明的过滤器汇入同一个
/// 集合，后续所有扫描使用的都是这个并集。
#[derive(Debug, Default, Clone)]
pub struct FilterSet {
    includes: Vec<TypeFilter>,
    excludes: Vec<TypeFilter>,
    /// 是否吸收过至少一条扫描指令
    saw_directive: bool,
    /// 吸收过的指令中是否有要求启用默认过滤器的
    default_filters_requested: bool,
}

impl FilterSet {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加包含过滤器
    pub fn add_include(&mut self, filter: TypeFilter) {
        self.includes.push(filter);
    }

    /// 添加排除过滤器
    pub fn add_exclude(&mut self, filter: TypeFilter) {
        self.excludes.push(filter);
    }

    /// 吸收一条扫描指令声明的过滤器
    pub fn absorb_directive(&mut self, directive: &ScanDirective) -> BootstrapResult<()> {
        self.saw_directive = true;
        if directive.use_default_filters {
            self.default_filters_requested = true;
        }
        for spec in &directive.include_filters {
            self.includes.push(TypeFilter::from_spec(spec)?);
        }
        for spec in &directive.exclude_filters {
            self.excludes.push(TypeFilter::from_spec(spec)?);
        }
        Ok(())
    }

    /// 默认过滤器是否生效
    ///
    /// 未吸收任何指令时默认生效；否则只要有一条指令要求即生效
    fn default_filters_active(&self) -> bool {
        !self.saw_directive || self.default_filters_requested
    }

    /// 候选类型是否通过过滤
    ///
    /// 排除优先：任一排除过滤器命中即拒绝。随后显式包含过滤器任一
    /// 命中即通过；默认过滤器生效时组件/配置标记存在也算通过。
    pub fn accepts(&self, meta: &TypeMeta, universe: &dyn TypeUniverse) -> bool {
        if self.excludes.iter().any(|f| f.matches(meta, universe)) {
            return false;
        }
        if self.includes.iter().any(|f| f.matches(meta, universe)) {
            return true;
        }
        if self.default_filters_active() {
            return meta.has_marker(MarkerKind::Component)
                || meta.has_marker(MarkerKind::Configuration);
        }
        // 显式关闭默认过滤器且无包含过滤器：全部非排除类型通过
        self.includes.is_empty()
    }
}
