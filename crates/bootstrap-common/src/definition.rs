//! 组件定义数据模型
//!
//! 提供流水线各阶段传递的可注册组件定义及其描述符

use crate::naming::NamingConventions;
use serde::{Deserialize, Serialize};

/// 作用域描述符
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeDescriptor {
    /// 单例模式 - 整个容器内共享一个实例
    Singleton,
    /// 原型模式 - 每次请求创建新实例
    Prototype,
    /// 自定义作用域，由宿主应用解释
    Custom(String),
}

impl Default for ScopeDescriptor {
    fn default() -> Self {
        Self::Singleton
    }
}

impl std::str::FromStr for ScopeDescriptor {
    type Err = crate::errors::BootstrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "singleton" => Ok(Self::Singleton),
            "prototype" => Ok(Self::Prototype),
            "" => Err(crate::errors::BootstrapError::InvalidMetadata {
                type_name: String::new(),
                message: "作用域名称不能为空".to_string(),
            }),
            other => Ok(Self::Custom(other.to_string())),
        }
    }
}

/// 作用域解析策略
///
/// 决定扫描或构建配置单元时如何为定义解析作用域
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopePolicy {
    /// 默认策略：读取候选上的作用域标记，缺省为单例
    MarkerDefault,
    /// 固定策略：忽略标记，统一使用指定作用域
    Fixed(ScopeDescriptor),
}

impl Default for ScopePolicy {
    fn default() -> Self {
        Self::MarkerDefault
    }
}

/// 组件设计角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    /// 应用级组件
    Application,
    /// 支撑性组件
    Support,
    /// 基础设施组件
    Infrastructure,
}

impl Default for ComponentRole {
    fn default() -> Self {
        Self::Application
    }
}

/// 自动装配模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutowireMode {
    /// 不自动装配
    No,
    /// 按名称装配
    ByName,
    /// 按类型装配
    ByType,
}

impl Default for AutowireMode {
    fn default() -> Self {
        Self::No
    }
}

/// 依赖边，可以按名称或按类型引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyRef {
    /// 按注册名称引用
    ByName(String),
    /// 按限定类型名引用
    ByType(String),
}

/// 生命周期描述符
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleDescriptor {
    /// 是否懒初始化
    pub lazy_init: bool,
    /// 初始化回调方法名
    pub init_method: Option<String>,
    /// 销毁回调方法名
    pub destroy_method: Option<String>,
    /// 初始化回调缺失时是否视为错误
    pub enforce_init: bool,
    /// 销毁回调缺失时是否视为错误
    pub enforce_destroy: bool,
}

/// 设计元数据描述符
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignDescriptor {
    /// 组件角色
    pub role: ComponentRole,
    /// 是否为同类型候选中的首选实现
    pub primary: bool,
    /// 排序值，数值越小越靠前
    pub order: Option<i32>,
}

/// 工厂方法回溯引用
///
/// 指向产出此定义的配置单元方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryMethodDescriptor {
    /// 所属配置单元的注册名称
    pub config_unit_name: String,
    /// 工厂方法名
    pub method_name: String,
    /// 声明该方法的限定类型名
    pub declaring_type: String,
}

/// 组件定义
///
/// 容器将要管理的一个单元的完整描述。在注册前保持可变，
/// 由当前持有它的流水线阶段独占修改，不会并发别名写入。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDefinition {
    /// 注册名称
    pub name: String,
    /// 声明类型的限定名
    pub declaring_type: String,
    /// 作用域
    pub scope: ScopeDescriptor,
    /// 生命周期元数据
    pub lifecycle: LifecycleDescriptor,
    /// 设计元数据
    pub design: DesignDescriptor,
    /// 自动装配模式
    pub autowire: AutowireMode,
    /// 显式依赖边
    pub depends_on: Vec<DependencyRef>,
    /// 工厂方法回溯引用（仅工厂方法产出的定义持有）
    pub factory_method: Option<FactoryMethodDescriptor>,
    /// 发现该定义的配置单元名称，名称冲突时用作命名空间前缀
    pub owning_unit: Option<String>,
    /// 是否允许为其生成代理
    pub proxy_eligible: bool,
    /// 人类可读描述
    pub description: Option<String>,
}

impl ComponentDefinition {
    /// 创建新的组件定义
    pub fn new(name: impl Into<String>, declaring_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring_type: declaring_type.into(),
            scope: ScopeDescriptor::default(),
            lifecycle: LifecycleDescriptor::default(),
            design: DesignDescriptor::default(),
            autowire: AutowireMode::default(),
            depends_on: Vec::new(),
            factory_method: None,
            owning_unit: None,
            proxy_eligible: false,
            description: None,
        }
    }

    /// 设置所属配置单元名称
    pub fn with_owning_unit(mut self, unit_name: impl Into<String>) -> Self {
        self.owning_unit = Some(unit_name.into());
        self
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: ScopeDescriptor) -> Self {
        self.scope = scope;
        self
    }

    /// 设置懒初始化
    pub fn with_lazy_init(mut self, lazy: bool) -> Self {
        self.lifecycle.lazy_init = lazy;
        self
    }

    /// 设置首选标志
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.design.primary = primary;
        self
    }

    /// 设置排序值
    pub fn with_order(mut self, order: i32) -> Self {
        self.design.order = Some(order);
        self
    }

    /// 设置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 添加依赖边
    pub fn with_dependency(mut self, dependency: DependencyRef) -> Self {
        self.depends_on.push(dependency);
        self
    }

    /// 声明类型所在的包名
    pub fn package(&self) -> &str {
        NamingConventions::package_of(&self.declaring_type)
    }

    /// 是否由工厂方法产出
    pub fn is_factory_produced(&self) -> bool {
        self.factory_method.is_some()
    }

    /// 最终注册阶段使用的确定性排序键：先按包名，再按声明类型，最后按名称
    pub fn ordering_key(&self) -> (String, String, String) {
        (
            self.package().to_string(),
            self.declaring_type.clone(),
            self.name.clone(),
        )
    }
}
