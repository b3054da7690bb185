//! 环境提供者抽象接口
//!
//! 提供属性查询与激活 Profile 访问的能力

use std::collections::HashMap;

/// 环境提供者 trait
pub trait Environment: Send + Sync {
    /// 查询属性值
    fn get_property(&self, key: &str) -> Option<String>;

    /// 获取激活的 Profile 列表
    fn active_profiles(&self) -> Vec<String>;

    /// 检查 Profile 限制是否被满足
    ///
    /// 任一声明的 Profile 匹配即为满足；`!` 前缀表示取反
    fn accepts_profiles(&self, profiles: &[String]) -> bool {
        if profiles.is_empty() {
            return true;
        }
        let active = self.active_profiles();
        profiles.iter().any(|p| match p.strip_prefix('!') {
            Some(negated) => !active.iter().any(|a| a == negated),
            None => active.iter().any(|a| a == p),
        })
    }
}

/// 基于静态映射的环境实现
#[derive(Debug, Default)]
pub struct StaticEnvironment {
    properties: HashMap<String, String>,
    profiles: Vec<String>,
}

impl StaticEnvironment {
    /// 创建空环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置属性
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// 激活一个 Profile
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.push(profile.into());
        self
    }
}

impl Environment for StaticEnvironment {
    fn get_property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn active_profiles(&self) -> Vec<String> {
        self.profiles.clone()
    }
}

/// 运行时/包版本提供者 trait
///
/// 供条件按宿主运行时版本或依赖包版本做门控
pub trait RuntimeVersionProvider: Send + Sync {
    /// 宿主运行时版本
    fn runtime_version(&self) -> String;

    /// 指定包的版本，未知时返回 None
    fn package_version(&self, package: &str) -> Option<String>;
}

/// 静态运行时版本提供者
#[derive(Debug)]
pub struct StaticRuntimeVersion {
    version: String,
    packages: HashMap<String, String>,
}

impl StaticRuntimeVersion {
    /// 创建指定版本的提供者
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            packages: HashMap::new(),
        }
    }

    /// 登记包版本
    pub fn with_package(mut self, package: impl Into<String>, version: impl Into<String>) -> Self {
        self.packages.insert(package.into(), version.into());
        self
    }
}

impl Default for StaticRuntimeVersion {
    fn default() -> Self {
        Self::new("unknown")
    }
}

impl RuntimeVersionProvider for StaticRuntimeVersion {
    fn runtime_version(&self) -> String {
        self.version.clone()
    }

    fn package_version(&self, package: &str) -> Option<String> {
        self.packages.get(package).cloned()
    }
}
