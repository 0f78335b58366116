//! # 平台模块（platform）
//!
//! ## 设计思路
//!
//! 启动器（桌面）是外部协作方，这里只规定它的最小调用面 `ShortcutHost`，
//! 所有调用都是阻塞的，由注册编排器放进 `spawn_blocking` 执行。
//!
//! 原生快捷方式管理能力按系统版本分叉：
//! - `capability`：`NativeCapability` / `CompatCapability` 两套实现，启动时按版本选择一次
//! - `memory`：进程内模拟启动器，供演示程序与测试使用
//!
//! ## 实现思路
//!
//! 调用点只依赖 `ShortcutCapability`，不在每个调用点内联版本判断。

mod capability;
mod memory;

pub use capability::{
    CompatCapability, NATIVE_SHORTCUT_API_LEVEL, NativeCapability, ShortcutCapability,
    select_capability,
};
pub use memory::InMemoryLauncher;

use crate::shortcut::ShortcutDescriptor;

/// 平台调用错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// 当前系统版本不提供该能力
    #[error("平台能力不可用：{0}")]
    Unavailable(String),

    /// 平台拒绝了请求（限流、已达上限等）
    #[error("平台拒绝请求：{0}")]
    Rejected(String),

    /// 调用过程中出现异常
    #[error("平台调用失败：{0}")]
    Call(String),
}

/// 启动器宿主调用面。
pub trait ShortcutHost: Send + Sync {
    /// 系统 API 版本号。
    fn api_level(&self) -> u32;

    /// 原生快捷方式管理器是否支持固定请求。
    fn native_request_pin_supported(&self) -> Result<bool, PlatformError>;

    /// 兼容路径（旧版启动器广播）是否可用。
    fn compat_request_pin_supported(&self) -> bool;

    /// 当前已固定的快捷方式 id 集合。
    fn pinned_shortcut_ids(&self) -> Result<Vec<String>, PlatformError>;

    /// 注册/更新动态快捷方式。
    fn add_dynamic_shortcut(&self, descriptor: &ShortcutDescriptor) -> Result<(), PlatformError>;

    /// 原生固定请求；返回值仅表示请求是否被受理。
    fn request_pin_shortcut(&self, descriptor: &ShortcutDescriptor) -> Result<bool, PlatformError>;

    /// 兼容路径固定请求。
    fn compat_request_pin_shortcut(
        &self,
        descriptor: &ShortcutDescriptor,
    ) -> Result<bool, PlatformError>;
}
