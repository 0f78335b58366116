//! # Tauri 插件入口
//!
//! ## 设计思路
//!
//! 宿主应用构建好 `ShortcutService` 后交给 `init`，插件负责：
//! 1. 把服务注册为托管状态，供命令层使用
//! 2. 订阅点击事件总线，并以 `onShortcutClick` 事件转发给 webview
//!
//! ## 实现思路
//!
//! 订阅在 `setup` 阶段建立，转发任务运行在 Tauri 的异步运行时上，
//! 服务被丢弃后总线关闭，转发任务随之退出。

use std::sync::Arc;

use tauri::plugin::{Builder, TauriPlugin};
use tauri::{Emitter, Manager, Runtime};

use crate::click::SHORTCUT_CLICK_EVENT;
use crate::commands;
use crate::service::ShortcutService;

pub const PLUGIN_NAME: &str = "pinned-shortcut";

pub fn init<R: Runtime>(service: Arc<ShortcutService>) -> TauriPlugin<R> {
    Builder::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            commands::is_supported,
            commands::create_pinned_shortcut,
            commands::is_pinned,
        ])
        .setup(move |app, _api| {
            let mut clicks = service.subscribe_clicks();
            app.manage(Arc::clone(&service));

            let handle = app.clone();
            tauri::async_runtime::spawn(async move {
                while let Some(event) = clicks.recv().await {
                    if let Err(err) = handle.emit(SHORTCUT_CLICK_EVENT, event.to_wire()) {
                        log::warn!("⚠️ 转发快捷方式点击事件失败：{}", err);
                    }
                }
                log::debug!("点击事件转发任务退出");
            });

            log::info!("setup: pinned-shortcut plugin ready ({})", service.capability_name());
            Ok(())
        })
        .build()
}
