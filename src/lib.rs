//! # 固定桌面快捷方式 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  应用层（不透明调用通道）                  │
//! │   isSupported / createPinnedShortcut / isPinned           │
//! │                        ↑ onShortcutClick                  │
//! └───────┬────────────────┼─────────────────────────────────┘
//!         ↓                │
//! ┌───────┼────────────────┼─────────────────────────────────┐
//! │  bridge / commands ── plugin（可选 tauri-plugin 特性）     │
//! │       ↓                ↑                                  │
//! │  service ── ShortcutService（宿主持有）                   │
//! │   ├─ shortcut ── ShortcutRegistrar（状态机 + 双重注册）   │
//! │   │   ├─ icon      解析 · 解码 · 下载 · 自适应合成        │
//! │   │   ├─ platform  ShortcutHost + Native/Compat 能力      │
//! │   │   └─ ledger    固定状态账本（SQLite / 内存键值）       │
//! │   └─ click ──── ClickDispatcher + EventBus               │
//! │                                                          │
//! │  error · config · storage（公共基础）                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`config`] | 下载/解码上限、账本键名、暂存目录 |
//! | [`storage`] | 暂存目录与账本数据库路径 |
//! | [`icon`] | 四类来源的图标解析、解码降采样、网络下载、自适应合成 |
//! | [`platform`] | 启动器调用面、按系统版本选择的能力实现、模拟启动器 |
//! | [`ledger`] | 本进程创建过的快捷方式记录，`isPinned` 的回退依据 |
//! | [`shortcut`] | 请求模型、描述对象、注册编排器 |
//! | [`click`] | 启动意图解码与点击事件广播 |
//! | [`service`] | 组装以上组件并暴露三个操作 |
//! | [`bridge`] | 入站方法调用分发 |
//!
//! ## 快速上手
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pinned_shortcut::icon::ImageSourceKind;
//! use pinned_shortcut::platform::InMemoryLauncher;
//! use pinned_shortcut::service::ShortcutService;
//! use pinned_shortcut::shortcut::ShortcutRequest;
//!
//! # async fn demo() -> Result<(), pinned_shortcut::error::AppError> {
//! let service = ShortcutService::builder(Arc::new(InMemoryLauncher::new(33))).build()?;
//! let request = ShortcutRequest::new("news", "News", "/tmp/news.png", ImageSourceKind::File);
//! if service.create_pinned_shortcut(request).await {
//!     assert!(service.is_pinned("news"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod click;
pub mod config;
pub mod error;
pub mod icon;
pub mod ledger;
pub mod platform;
pub mod service;
pub mod shortcut;
pub mod storage;

#[cfg(feature = "tauri-plugin")]
pub mod commands;
#[cfg(feature = "tauri-plugin")]
pub mod plugin;
