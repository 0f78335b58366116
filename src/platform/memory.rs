//! 进程内模拟启动器。
//!
//! 用于演示程序与测试：可切换系统版本、固定能力、是否接受固定请求、
//! 动态注册是否失败；记录收到的动态/固定快捷方式，并能模拟用户点击。

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{NATIVE_SHORTCUT_API_LEVEL, PlatformError, ShortcutHost};
use crate::click::LaunchIntent;
use crate::shortcut::ShortcutDescriptor;

#[derive(Debug)]
struct LauncherState {
    native_pin_supported: bool,
    compat_pin_supported: bool,
    accept_pins: bool,
    fail_dynamic: bool,
    native_query_fails: bool,
    dynamic: BTreeMap<String, ShortcutDescriptor>,
    pinned: BTreeMap<String, ShortcutDescriptor>,
    pin_requests: usize,
}

/// 模拟启动器。
#[derive(Debug)]
pub struct InMemoryLauncher {
    api_level: u32,
    state: Mutex<LauncherState>,
}

impl InMemoryLauncher {
    /// 默认支持固定、接受所有固定请求。
    pub fn new(api_level: u32) -> Self {
        Self {
            api_level,
            state: Mutex::new(LauncherState {
                native_pin_supported: true,
                compat_pin_supported: true,
                accept_pins: true,
                fail_dynamic: false,
                native_query_fails: false,
                dynamic: BTreeMap::new(),
                pinned: BTreeMap::new(),
                pin_requests: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, LauncherState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_native(&self) -> bool {
        self.api_level >= NATIVE_SHORTCUT_API_LEVEL
    }

    pub fn set_native_pin_supported(&self, supported: bool) {
        self.state().native_pin_supported = supported;
    }

    pub fn set_compat_pin_supported(&self, supported: bool) {
        self.state().compat_pin_supported = supported;
    }

    /// 模拟用户在确认界面上同意/拒绝固定。
    pub fn set_accept_pins(&self, accept: bool) {
        self.state().accept_pins = accept;
    }

    pub fn set_fail_dynamic(&self, fail: bool) {
        self.state().fail_dynamic = fail;
    }

    /// 让原生查询（能力、已固定集合）抛出异常。
    pub fn set_native_query_fails(&self, fails: bool) {
        self.state().native_query_fails = fails;
    }

    pub fn dynamic_ids(&self) -> Vec<String> {
        self.state().dynamic.keys().cloned().collect()
    }

    pub fn pinned(&self, id: &str) -> Option<ShortcutDescriptor> {
        self.state().pinned.get(id).cloned()
    }

    pub fn pin_request_count(&self) -> usize {
        self.state().pin_requests
    }

    /// 模拟用户从桌面移除图标。
    pub fn remove_pinned(&self, id: &str) -> bool {
        self.state().pinned.remove(id).is_some()
    }

    /// 模拟用户点击桌面上的快捷方式，返回启动意图。
    pub fn tap(&self, id: &str) -> Option<LaunchIntent> {
        self.state().pinned.get(id).map(|descriptor| descriptor.launch.clone())
    }

    fn pin(&self, descriptor: &ShortcutDescriptor) -> bool {
        let mut state = self.state();
        state.pin_requests += 1;
        if !state.accept_pins {
            log::debug!("模拟启动器拒绝固定 - id: {}", descriptor.id);
            return false;
        }
        state.pinned.insert(descriptor.id.clone(), descriptor.clone());
        true
    }

    fn require_native(&self, call: &str) -> Result<(), PlatformError> {
        if self.is_native() {
            Ok(())
        } else {
            Err(PlatformError::Unavailable(format!(
                "{} 需要 API {}+（当前 {}）",
                call, NATIVE_SHORTCUT_API_LEVEL, self.api_level
            )))
        }
    }
}

impl ShortcutHost for InMemoryLauncher {
    fn api_level(&self) -> u32 {
        self.api_level
    }

    fn native_request_pin_supported(&self) -> Result<bool, PlatformError> {
        self.require_native("isRequestPinShortcutSupported")?;
        let state = self.state();
        if state.native_query_fails {
            return Err(PlatformError::Call("启动器服务不可用".to_string()));
        }
        Ok(state.native_pin_supported)
    }

    fn compat_request_pin_supported(&self) -> bool {
        self.state().compat_pin_supported
    }

    fn pinned_shortcut_ids(&self) -> Result<Vec<String>, PlatformError> {
        self.require_native("getPinnedShortcuts")?;
        let state = self.state();
        if state.native_query_fails {
            return Err(PlatformError::Call("启动器服务不可用".to_string()));
        }
        Ok(state.pinned.keys().cloned().collect())
    }

    fn add_dynamic_shortcut(&self, descriptor: &ShortcutDescriptor) -> Result<(), PlatformError> {
        self.require_native("addDynamicShortcuts")?;
        let mut state = self.state();
        if state.fail_dynamic {
            return Err(PlatformError::Rejected("动态快捷方式已达上限".to_string()));
        }
        state.dynamic.insert(descriptor.id.clone(), descriptor.clone());
        Ok(())
    }

    fn request_pin_shortcut(&self, descriptor: &ShortcutDescriptor) -> Result<bool, PlatformError> {
        self.require_native("requestPinShortcut")?;
        if !self.state().native_pin_supported {
            return Ok(false);
        }
        Ok(self.pin(descriptor))
    }

    fn compat_request_pin_shortcut(
        &self,
        descriptor: &ShortcutDescriptor,
    ) -> Result<bool, PlatformError> {
        if !self.state().compat_pin_supported {
            return Ok(false);
        }
        Ok(self.pin(descriptor))
    }
}
