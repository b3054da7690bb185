//! 声明式元数据模式
//!
//! 候选类型与方法的标记信息由宿主前端（解析宿主语言原生注解语法的
//! 部分）产生，并以显式结构体的形式喂给装配引擎。整个模式支持 serde
//! 序列化，因此候选元数据也可以从 JSON/配置文件加载。

use crate::definition::{AutowireMode, DependencyRef, ScopeDescriptor, ScopePolicy};
use crate::naming::{NamingConventions, NamingPolicy};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// 条件键
///
/// 稳定的字符串键，用于在内建条件表或反射提供者中查找条件实现
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionKey(pub String);

impl ConditionKey {
    /// 创建新的条件键
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConditionKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// 普通类
    Class,
    /// 接口/trait
    Interface,
    /// 注解/标记种类本身，永远不会成为组件
    AnnotationKind,
}

/// 方法返回类型的解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// 静态可确定的限定类型名
    Type(String),
    /// void 返回，无法作为组件
    Void,
    /// 无法静态确定（例如未解析的异步泛型元素类型）
    Unresolved,
}

/// 过滤器规格
///
/// 扫描指令中可序列化的过滤规则描述，由引擎编译为实际过滤器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterSpec {
    /// 标记存在性过滤
    MarkerPresence { marker: MarkerKind },
    /// 可赋值性过滤（候选可赋值给指定超类型）
    AssignableTo { type_name: String },
    /// 名称正则过滤
    Pattern { regex: String },
}

/// 扫描指令
///
/// 不可变值对象，声明在配置单元上
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDirective {
    /// 目标包名列表
    pub packages: Vec<String>,
    /// 包含过滤器
    #[serde(default)]
    pub include_filters: Vec<FilterSpec>,
    /// 排除过滤器
    #[serde(default)]
    pub exclude_filters: Vec<FilterSpec>,
    /// 是否启用默认过滤器（组件标记存在性）
    #[serde(default = "default_true")]
    pub use_default_filters: bool,
    /// 作用域解析策略覆盖
    #[serde(default)]
    pub scope_policy: Option<ScopePolicy>,
    /// 命名策略覆盖
    #[serde(default)]
    pub naming_policy: Option<NamingPolicy>,
}

impl ScanDirective {
    /// 创建指向若干包的扫描指令
    pub fn of_packages<S: Into<String>>(packages: impl IntoIterator<Item = S>) -> Self {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
            include_filters: Vec::new(),
            exclude_filters: Vec::new(),
            use_default_filters: true,
            scope_policy: None,
            naming_policy: None,
        }
    }

    /// 覆盖命名策略
    pub fn with_naming_policy(mut self, policy: NamingPolicy) -> Self {
        self.naming_policy = Some(policy);
        self
    }

    /// 添加包含过滤器
    pub fn with_include_filter(mut self, filter: FilterSpec) -> Self {
        self.include_filters.push(filter);
        self
    }

    /// 添加排除过滤器
    pub fn with_exclude_filter(mut self, filter: FilterSpec) -> Self {
        self.exclude_filters.push(filter);
        self
    }

    /// 关闭默认过滤器
    pub fn without_default_filters(mut self) -> Self {
        self.use_default_filters = false;
        self
    }
}

/// 导入指令引用
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportRef {
    /// 直接导入一个类型
    Type { name: String },
    /// 将一个包交给扫描器处理
    Package { name: String },
    /// 显式禁用：匹配此引用的定义一律排除在最终注册之外
    Disabled { name: String },
}

impl ImportRef {
    /// 引用的目标名称
    pub fn target(&self) -> &str {
        match self {
            Self::Type { name } | Self::Package { name } | Self::Disabled { name } => name,
        }
    }
}

/// 标记种类，用于过滤与分发查表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Configuration,
    Component,
    FactoryMethod,
    ComponentScan,
    Import,
    Conditional,
    Profile,
    PropertyCondition,
    TypePresence,
    Scope,
    Lazy,
    Primary,
    Order,
    Role,
    DependsOn,
    Description,
}

/// 声明式标记
///
/// 候选类型或方法上的一条声明信息。引擎只解释这些数据，
/// 不定义任何注解语法。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Marker {
    /// 配置单元标记
    Configuration {
        /// 是否为自动激活配置（发现即纳入，无需显式导入）
        #[serde(default)]
        auto_activate: bool,
        /// 代理策略：单元方法间调用是否经过代理
        #[serde(default = "default_true")]
        proxy_unit_methods: bool,
    },
    /// 普通组件标记
    Component {
        #[serde(default)]
        name: Option<String>,
    },
    /// 工厂方法标记（仅声明在方法上）
    FactoryMethod {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        init_method: Option<String>,
        #[serde(default)]
        destroy_method: Option<String>,
        #[serde(default)]
        enforce_init: bool,
        #[serde(default)]
        enforce_destroy: bool,
        #[serde(default)]
        autowire: AutowireMode,
    },
    /// 扫描指令
    ComponentScan(ScanDirective),
    /// 导入指令
    Import { refs: Vec<ImportRef> },
    /// 命名条件列表，按声明顺序评估
    Conditional { conditions: Vec<ConditionKey> },
    /// 环境 Profile 限制
    Profile { profiles: Vec<String> },
    /// 属性匹配条件
    PropertyCondition {
        names: Vec<String>,
        #[serde(default)]
        having_value: Option<String>,
        #[serde(default)]
        match_if_missing: bool,
    },
    /// 类型存在性条件
    TypePresence {
        #[serde(default)]
        required: Vec<String>,
        #[serde(default)]
        missing: Vec<String>,
    },
    /// 作用域覆盖
    Scope { scope: ScopeDescriptor },
    /// 懒初始化标记
    Lazy {
        #[serde(default = "default_true")]
        value: bool,
    },
    /// 首选实现标记
    Primary,
    /// 排序值
    Order { value: i32 },
    /// 设计角色
    Role { role: crate::definition::ComponentRole },
    /// 显式依赖列表
    DependsOn { refs: Vec<DependencyRef> },
    /// 人类可读描述
    Description { text: String },
}

impl Marker {
    /// 标记的种类
    pub fn meta_kind(&self) -> MarkerKind {
        match self {
            Self::Configuration { .. } => MarkerKind::Configuration,
            Self::Component { .. } => MarkerKind::Component,
            Self::FactoryMethod { .. } => MarkerKind::FactoryMethod,
            Self::ComponentScan(_) => MarkerKind::ComponentScan,
            Self::Import { .. } => MarkerKind::Import,
            Self::Conditional { .. } => MarkerKind::Conditional,
            Self::Profile { .. } => MarkerKind::Profile,
            Self::PropertyCondition { .. } => MarkerKind::PropertyCondition,
            Self::TypePresence { .. } => MarkerKind::TypePresence,
            Self::Scope { .. } => MarkerKind::Scope,
            Self::Lazy { .. } => MarkerKind::Lazy,
            Self::Primary => MarkerKind::Primary,
            Self::Order { .. } => MarkerKind::Order,
            Self::Role { .. } => MarkerKind::Role,
            Self::DependsOn { .. } => MarkerKind::DependsOn,
            Self::Description { .. } => MarkerKind::Description,
        }
    }

    /// 是否为条件类标记（参与谓词评估）
    pub fn is_conditional(&self) -> bool {
        matches!(
            self.meta_kind(),
            MarkerKind::Conditional | MarkerKind::PropertyCondition | MarkerKind::TypePresence
        )
    }
}

/// 方法元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodMeta {
    /// 方法名
    pub name: String,
    /// 返回类型解析结果
    pub return_type: ReturnKind,
    /// 是否为异步方法
    #[serde(default)]
    pub is_async: bool,
    /// 方法上的标记，按声明顺序
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl MethodMeta {
    /// 创建新的方法元数据
    pub fn new(name: impl Into<String>, return_type: ReturnKind) -> Self {
        Self {
            name: name.into(),
            return_type,
            is_async: false,
            markers: Vec::new(),
        }
    }

    /// 标记为异步方法
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// 添加标记
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// 查找指定种类的第一个标记
    pub fn marker_of(&self, kind: MarkerKind) -> Option<&Marker> {
        self.markers.iter().find(|m| m.meta_kind() == kind)
    }

    /// 是否声明为工厂方法
    pub fn is_factory_method(&self) -> bool {
        self.marker_of(MarkerKind::FactoryMethod).is_some()
    }
}

/// 候选类型元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMeta {
    /// 限定类型名，例如 `app.services.ServiceA`
    pub qualified_name: String,
    /// 类型种类
    pub kind: TypeKind,
    /// 类型上的标记，按声明顺序
    #[serde(default)]
    pub markers: Vec<Marker>,
    /// 声明的方法
    #[serde(default)]
    pub methods: Vec<MethodMeta>,
    /// 可赋值目标（超类型/实现的接口的限定名）
    #[serde(default)]
    pub assignable_to: Vec<String>,
}

impl TypeMeta {
    /// 创建新的类型元数据
    pub fn new(qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            markers: Vec::new(),
            methods: Vec::new(),
            assignable_to: Vec::new(),
        }
    }

    /// 创建普通类元数据的便捷方法
    pub fn class(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, TypeKind::Class)
    }

    /// 类型所在的包名
    pub fn package(&self) -> &str {
        NamingConventions::package_of(&self.qualified_name)
    }

    /// 类型短名（去掉包路径）
    pub fn short_name(&self) -> &str {
        NamingConventions::short_name_of(&self.qualified_name)
    }

    /// 添加标记
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// 添加方法
    pub fn with_method(mut self, method: MethodMeta) -> Self {
        self.methods.push(method);
        self
    }

    /// 添加可赋值目标
    pub fn with_assignable_to(mut self, type_name: impl Into<String>) -> Self {
        self.assignable_to.push(type_name.into());
        self
    }

    /// 查找指定种类的第一个标记
    pub fn marker_of(&self, kind: MarkerKind) -> Option<&Marker> {
        self.markers.iter().find(|m| m.meta_kind() == kind)
    }

    /// 是否持有指定种类的标记
    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        self.marker_of(kind).is_some()
    }

    /// 是否被标记为配置单元
    pub fn is_configuration(&self) -> bool {
        self.has_marker(MarkerKind::Configuration)
    }

    /// 是否为自动激活配置
    pub fn is_auto_activating(&self) -> bool {
        matches!(
            self.marker_of(MarkerKind::Configuration),
            Some(Marker::Configuration {
                auto_activate: true,
                ..
            })
        )
    }

    /// 配置单元代理策略；非配置单元返回 None
    pub fn proxy_unit_methods(&self) -> Option<bool> {
        match self.marker_of(MarkerKind::Configuration) {
            Some(Marker::Configuration {
                proxy_unit_methods, ..
            }) => Some(*proxy_unit_methods),
            _ => None,
        }
    }

    /// 组件名称覆盖（组件标记上声明的显式名称）
    pub fn component_name_override(&self) -> Option<&str> {
        match self.marker_of(MarkerKind::Component) {
            Some(Marker::Component { name }) => name.as_deref(),
            _ => None,
        }
    }

    /// 声明的所有扫描指令
    pub fn scan_directives(&self) -> Vec<&ScanDirective> {
        self.markers
            .iter()
            .filter_map(|m| match m {
                Marker::ComponentScan(directive) => Some(directive),
                _ => None,
            })
            .collect()
    }

    /// 声明的所有导入引用，按声明顺序展平
    pub fn import_refs(&self) -> Vec<&ImportRef> {
        self.markers
            .iter()
            .filter_map(|m| match m {
                Marker::Import { refs } => Some(refs.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// 环境 Profile 限制；未声明时返回 None
    pub fn profile_restriction(&self) -> Option<&[String]> {
        match self.marker_of(MarkerKind::Profile) {
            Some(Marker::Profile { profiles }) => Some(profiles),
            _ => None,
        }
    }

    /// 声明的作用域覆盖
    pub fn declared_scope(&self) -> Option<&ScopeDescriptor> {
        match self.marker_of(MarkerKind::Scope) {
            Some(Marker::Scope { scope }) => Some(scope),
            _ => None,
        }
    }

    /// 工厂方法列表，按声明顺序
    pub fn factory_methods(&self) -> Vec<&MethodMeta> {
        self.methods
            .iter()
            .filter(|m| m.is_factory_method())
            .collect()
    }
}
