//! 命名约定规范
//!
//! 提供组件名称生成与限定名切分的约定实现

use serde::{Deserialize, Serialize};

/// 扫描产出定义的命名策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// 默认策略：短名首字母小写
    #[default]
    ShortName,
    /// 使用完整限定名作为注册名称
    QualifiedName,
}

impl NamingPolicy {
    /// 按策略为限定类型名生成注册名称
    pub fn name_for(&self, qualified_name: &str) -> String {
        match self {
            Self::ShortName => NamingConventions::component_name(qualified_name),
            Self::QualifiedName => qualified_name.to_string(),
        }
    }
}

/// 命名约定规范
#[derive(Debug)]
pub struct NamingConventions;

impl NamingConventions {
    /// 从限定类型名生成默认组件名称：短名首字母小写
    ///
    /// 例如 `app.services.ServiceA` 生成 `serviceA`
    pub fn component_name(qualified_name: &str) -> String {
        Self::decapitalize(Self::short_name_of(qualified_name))
    }

    /// 限定名所在的包名；无包路径时返回空串
    pub fn package_of(qualified_name: &str) -> &str {
        match qualified_name.rfind('.') {
            Some(idx) => &qualified_name[..idx],
            None => "",
        }
    }

    /// 限定名的短名部分
    pub fn short_name_of(qualified_name: &str) -> &str {
        qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(qualified_name)
    }

    /// 首字母小写
    pub fn decapitalize(name: &str) -> String {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// 名称冲突时的命名空间化：以所属配置单元名称为前缀
    pub fn namespaced(unit_name: &str, member_name: &str) -> String {
        format!("{}.{}", unit_name, member_name)
    }

    /// 判断一个限定名是否位于指定包内（含子包）
    pub fn in_package(qualified_name: &str, package: &str) -> bool {
        if package.is_empty() {
            return true;
        }
        match qualified_name.strip_prefix(package) {
            Some(rest) => rest.starts_with('.'),
            None => false,
        }
    }
}
