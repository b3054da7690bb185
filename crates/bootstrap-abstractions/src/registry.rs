//! 定义注册表抽象接口

use async_trait::async_trait;
use bootstrap_common::{BootstrapError, BootstrapResult, ComponentDefinition};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// 定义注册表 trait
///
/// 装配引擎消费并产出的注册表/工厂接口。注册时名称必须唯一。
#[async_trait]
pub trait DefinitionRegistry: Send + Sync {
    /// 注册一个定义；名称冲突时返回错误
    async fn register_definition(
        &self,
        name: &str,
        definition: ComponentDefinition,
    ) -> BootstrapResult<()>;

    /// 检查指定名称是否已注册
    async fn contains_definition(&self, name: &str) -> bool;

    /// 获取所有已注册定义的名称，按注册顺序
    async fn definition_names(&self) -> Vec<String>;

    /// 按名称获取定义
    async fn get_definition(&self, name: &str) -> Option<ComponentDefinition>;
}

#[derive(Debug, Default)]
struct RegistryState {
    definitions: HashMap<String, ComponentDefinition>,
    /// 注册顺序
    order: Vec<String>,
}

/// 内存中的定义注册表实现
#[derive(Debug, Default)]
pub struct InMemoryDefinitionRegistry {
    state: RwLock<RegistryState>,
}

impl InMemoryDefinitionRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前注册的定义数量
    pub async fn len(&self) -> usize {
        self.state.read().await.order.len()
    }

    /// 注册表是否为空
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DefinitionRegistry for InMemoryDefinitionRegistry {
    async fn register_definition(
        &self,
        name: &str,
        definition: ComponentDefinition,
    ) -> BootstrapResult<()> {
        let mut state = self.state.write().await;
        if state.definitions.contains_key(name) {
            return Err(BootstrapError::registration(name, "名称已被占用"));
        }
        debug!("注册定义: name={}, type={}", name, definition.declaring_type);
        state.definitions.insert(name.to_string(), definition);
        state.order.push(name.to_string());
        Ok(())
    }

    async fn contains_definition(&self, name: &str) -> bool {
        self.state.read().await.definitions.contains_key(name)
    }

    async fn definition_names(&self) -> Vec<String> {
        self.state.read().await.order.clone()
    }

    async fn get_definition(&self, name: &str) -> Option<ComponentDefinition> {
        self.state.read().await.definitions.get(name).cloned()
    }
}
