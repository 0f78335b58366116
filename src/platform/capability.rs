//! 平台能力分叉：原生快捷方式管理（API 26+）与旧版兼容路径。

use std::sync::Arc;

use super::{PlatformError, ShortcutHost};
use crate::shortcut::ShortcutDescriptor;

/// 引入原生快捷方式管理的系统 API 版本。
pub const NATIVE_SHORTCUT_API_LEVEL: u32 = 26;

/// 注册编排器依赖的能力接口。
pub trait ShortcutCapability: Send + Sync {
    fn name(&self) -> &'static str;

    /// 是否支持固定快捷方式；查询异常按不支持处理。
    fn is_supported(&self) -> bool;

    /// 平台实时的已固定集合；无法查询时返回 `None`。
    fn pinned_ids(&self) -> Option<Vec<String>>;

    fn register_dynamic(&self, descriptor: &ShortcutDescriptor) -> Result<(), PlatformError>;

    fn request_pin(&self, descriptor: &ShortcutDescriptor) -> Result<bool, PlatformError>;
}

pub struct NativeCapability {
    host: Arc<dyn ShortcutHost>,
}

impl NativeCapability {
    pub fn new(host: Arc<dyn ShortcutHost>) -> Self {
        Self { host }
    }
}

impl ShortcutCapability for NativeCapability {
    fn name(&self) -> &'static str {
        "native"
    }

    fn is_supported(&self) -> bool {
        match self.host.native_request_pin_supported() {
            Ok(supported) => supported,
            Err(err) => {
                log::warn!("⚠️ 查询固定能力失败，按不支持处理：{}", err);
                false
            }
        }
    }

    fn pinned_ids(&self) -> Option<Vec<String>> {
        match self.host.pinned_shortcut_ids() {
            Ok(ids) => Some(ids),
            Err(err) => {
                log::warn!("⚠️ 查询已固定快捷方式失败，回退账本：{}", err);
                None
            }
        }
    }

    fn register_dynamic(&self, descriptor: &ShortcutDescriptor) -> Result<(), PlatformError> {
        self.host.add_dynamic_shortcut(descriptor)
    }

    fn request_pin(&self, descriptor: &ShortcutDescriptor) -> Result<bool, PlatformError> {
        self.host.request_pin_shortcut(descriptor)
    }
}

/// 旧版系统：无法查询已固定集合，也没有动态快捷方式，只剩兼容固定请求。
pub struct CompatCapability {
    host: Arc<dyn ShortcutHost>,
}

impl CompatCapability {
    pub fn new(host: Arc<dyn ShortcutHost>) -> Self {
        Self { host }
    }
}

impl ShortcutCapability for CompatCapability {
    fn name(&self) -> &'static str {
        "compat"
    }

    fn is_supported(&self) -> bool {
        self.host.compat_request_pin_supported()
    }

    fn pinned_ids(&self) -> Option<Vec<String>> {
        None
    }

    fn register_dynamic(&self, _descriptor: &ShortcutDescriptor) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable(format!(
            "动态快捷方式需要 API {}+（当前 {}）",
            NATIVE_SHORTCUT_API_LEVEL,
            self.host.api_level()
        )))
    }

    fn request_pin(&self, descriptor: &ShortcutDescriptor) -> Result<bool, PlatformError> {
        self.host.compat_request_pin_shortcut(descriptor)
    }
}

/// 按系统版本选择能力实现，只在启动时调用一次。
pub fn select_capability(host: Arc<dyn ShortcutHost>) -> Arc<dyn ShortcutCapability> {
    let api_level = host.api_level();
    let capability: Arc<dyn ShortcutCapability> = if api_level >= NATIVE_SHORTCUT_API_LEVEL {
        Arc::new(NativeCapability::new(host))
    } else {
        Arc::new(CompatCapability::new(host))
    };

    log::info!("🔧 快捷方式能力：{}（API {}）", capability.name(), api_level);
    capability
}
