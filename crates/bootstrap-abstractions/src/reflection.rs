//! 反射/类型内省提供者抽象接口
//!
//! 引擎通过此接口枚举包内类型、查询可赋值性并实例化条件与
//! 导入选择器。按约定这些查询是同步、无副作用的。

use crate::condition::{Condition, ImportSelector};
use bootstrap_common::{NamingConventions, TypeMeta};
use std::collections::HashMap;
use std::sync::Arc;

/// 类型内省提供者 trait
pub trait TypeUniverse: Send + Sync {
    /// 枚举指定包（含子包）中声明的所有类型
    fn types_in_package(&self, package: &str) -> Vec<Arc<TypeMeta>>;

    /// 按限定名查找类型
    fn get_type(&self, qualified_name: &str) -> Option<Arc<TypeMeta>>;

    /// 检查 `type_name` 是否可赋值给 `target`
    fn is_assignable(&self, type_name: &str, target: &str) -> bool;

    /// 按条件键实例化一个条件；无法实例化时返回 None
    fn instantiate_condition(&self, key: &str) -> Option<Arc<dyn Condition>>;

    /// 若指定类型具备动态导入选择器能力，实例化之
    fn instantiate_selector(&self, type_name: &str) -> Option<Arc<dyn ImportSelector>>;

    /// 类型是否存在
    fn contains_type(&self, qualified_name: &str) -> bool {
        self.get_type(qualified_name).is_some()
    }
}

/// 内存中的类型内省提供者实现
///
/// 宿主前端把解析好的候选元数据、自定义条件与选择器登记进来，
/// 构建后不可变
pub struct InMemoryTypeUniverse {
    types: HashMap<String, Arc<TypeMeta>>,
    conditions: HashMap<String, Arc<dyn Condition>>,
    selectors: HashMap<String, Arc<dyn ImportSelector>>,
}

impl InMemoryTypeUniverse {
    /// 创建构建器
    pub fn builder() -> TypeUniverseBuilder {
        TypeUniverseBuilder::new()
    }
}

impl TypeUniverse for InMemoryTypeUniverse {
    fn types_in_package(&self, package: &str) -> Vec<Arc<TypeMeta>> {
        let mut types: Vec<Arc<TypeMeta>> = self
            .types
            .values()
            .filter(|t| NamingConventions::in_package(&t.qualified_name, package))
            .cloned()
            .collect();
        // 枚举顺序确定化
        types.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        types
    }

    fn get_type(&self, qualified_name: &str) -> Option<Arc<TypeMeta>> {
        self.types.get(qualified_name).cloned()
    }

    fn is_assignable(&self, type_name: &str, target: &str) -> bool {
        if type_name == target {
            return true;
        }
        // 沿可赋值目标链逐级查找
        let mut queue = vec![type_name.to_string()];
        let mut seen = std::collections::HashSet::new();
        while let Some(current) = queue.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(meta) = self.types.get(&current) {
                for parent in &meta.assignable_to {
                    if parent == target {
                        return true;
                    }
                    queue.push(parent.clone());
                }
            }
        }
        false
    }

    fn instantiate_condition(&self, key: &str) -> Option<Arc<dyn Condition>> {
        self.conditions.get(key).cloned()
    }

    fn instantiate_selector(&self, type_name: &str) -> Option<Arc<dyn ImportSelector>> {
        self.selectors.get(type_name).cloned()
    }
}

/// 类型内省提供者构建器
#[derive(Default)]
pub struct TypeUniverseBuilder {
    types: HashMap<String, Arc<TypeMeta>>,
    conditions: HashMap<String, Arc<dyn Condition>>,
    selectors: HashMap<String, Arc<dyn ImportSelector>>,
}

impl TypeUniverseBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个类型
    pub fn with_type(mut self, meta: TypeMeta) -> Self {
        self.types
            .insert(meta.qualified_name.clone(), Arc::new(meta));
        self
    }

    /// 登记一个自定义条件实现
    pub fn with_condition(mut self, key: impl Into<String>, condition: Arc<dyn Condition>) -> Self {
        self.conditions.insert(key.into(), condition);
        self
    }

    /// 为指定类型登记动态导入选择器能力
    pub fn with_selector(
        mut self,
        type_name: impl Into<String>,
        selector: Arc<dyn ImportSelector>,
    ) -> Self {
        self.selectors.insert(type_name.into(), selector);
        self
    }

    /// 构建不可变的类型宇宙
    pub fn build(self) -> InMemoryTypeUniverse {
        InMemoryTypeUniverse {
            types: self.types,
            conditions: self.conditions,
            selectors: self.selectors,
        }
    }
}
