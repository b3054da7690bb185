//! 单次引导运行的可变追踪状态
//!
//! 所有去重集合都限定在一次运行的生命周期内，随运行对象创建、
//! 随 [`BootstrapRun::clear`] 丢弃，不使用进程级静态状态。

use bootstrap_common::NamingConventions;
use chrono::{DateTime, Utc};
use dashmap::DashSet;
use uuid::Uuid;

/// 一次引导运行的追踪状态
///
/// 集合的追加在内部同步，多个子流程可以安全地争抢登记同一个
/// 类型；`mark_*` 方法返回是否为首次登记。
#[derive(Debug)]
pub struct BootstrapRun {
    /// 运行标识，用于日志关联
    pub id: Uuid,
    /// 运行开始时间
    pub started_at: DateTime<Utc>,
    /// 已转换为定义的限定类型名
    converted_types: DashSet<String>,
    /// 已扫描过的包名
    scanned_packages: DashSet<String>,
    /// 已作为配置单元解析过的限定类型名
    processed_units: DashSet<String>,
    /// 已完成导入解析的配置单元
    imports_resolved: DashSet<String>,
    /// 当前处于导入解析栈上的限定类型名
    import_stack: DashSet<String>,
    /// 禁用导入引用（限定类型名或包名）
    disabled_imports: DashSet<String>,
    /// 被发现的自动激活配置
    auto_activated: DashSet<String>,
}

impl BootstrapRun {
    /// 开始一次新的引导运行
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            converted_types: DashSet::new(),
            scanned_packages: DashSet::new(),
            processed_units: DashSet::new(),
            imports_resolved: DashSet::new(),
            import_stack: DashSet::new(),
            disabled_imports: DashSet::new(),
            auto_activated: DashSet::new(),
        }
    }

    /// 登记一个类型已被转换为定义；首次登记返回 true
    pub fn mark_converted(&self, qualified_name: &str) -> bool {
        self.converted_types.insert(qualified_name.to_string())
    }

    /// 类型是否已被转换
    pub fn is_converted(&self, qualified_name: &str) -> bool {
        self.converted_types.contains(qualified_name)
    }

    /// 登记一个包已被扫描；首次登记返回 true
    pub fn mark_scanned(&self, package: &str) -> bool {
        self.scanned_packages.insert(package.to_string())
    }

    /// 登记一个配置单元已被解析；首次登记返回 true
    pub fn mark_unit_processed(&self, qualified_name: &str) -> bool {
        self.processed_units.insert(qualified_name.to_string())
    }

    /// 登记一个单元的导入已解析完成；首次登记返回 true
    pub fn mark_imports_resolved(&self, qualified_name: &str) -> bool {
        self.imports_resolved.insert(qualified_name.to_string())
    }

    /// 进入一个单元的导入解析；已在栈上时返回 false
    pub fn enter_import(&self, qualified_name: &str) -> bool {
        self.import_stack.insert(qualified_name.to_string())
    }

    /// 离开一个单元的导入解析
    pub fn leave_import(&self, qualified_name: &str) {
        self.import_stack.remove(qualified_name);
    }

    /// 指定类型是否正处于导入解析栈上
    pub fn is_importing(&self, qualified_name: &str) -> bool {
        self.import_stack.contains(qualified_name)
    }

    /// 登记一个禁用导入引用
    pub fn mark_disabled(&self, reference: &str) {
        self.disabled_imports.insert(reference.to_string());
    }

    /// 指定类型是否命中禁用导入规则
    ///
    /// 匹配限定名精确相等，或禁用引用等于该类型的所属包名
    pub fn is_disabled(&self, qualified_name: &str) -> bool {
        if self.disabled_imports.contains(qualified_name) {
            return true;
        }
        let package = NamingConventions::package_of(qualified_name);
        !package.is_empty() && self.disabled_imports.contains(package)
    }

    /// 登记一个自动激活配置；首次登记返回 true
    pub fn mark_auto_activated(&self, qualified_name: &str) -> bool {
        self.auto_activated.insert(qualified_name.to_string())
    }

    /// 指定类型是否作为自动激活配置被追踪
    pub fn is_auto_activated(&self, qualified_name: &str) -> bool {
        self.auto_activated.contains(qualified_name)
    }

    /// 清空全部追踪状态，供编排器在运行结束时复位
    pub fn clear(&self) {
        self.converted_types.clear();
        self.scanned_packages.clear();
        self.processed_units.clear();
        self.imports_resolved.clear();
        self.import_stack.clear();
        self.disabled_imports.clear();
        self.auto_activated.clear();
    }
}

impl Default for BootstrapRun {
    fn default() -> Self {
        Self::new()
    }
}
