//! # Tauri 命令层
//!
//! 命令层仅做 IPC 参数接收与结果返回，实际处理交给 `ShortcutService`。

use std::sync::Arc;

use tauri::State;

use crate::bridge::{self, CreateShortcutArgs};
use crate::error::AppError;
use crate::service::ShortcutService;

#[tauri::command]
pub fn is_supported(state: State<'_, Arc<ShortcutService>>) -> Result<bool, AppError> {
    Ok(state.is_supported())
}

/// 创建固定快捷方式。
#[tauri::command]
pub async fn create_pinned_shortcut(
    state: State<'_, Arc<ShortcutService>>,
    request: CreateShortcutArgs,
) -> Result<bool, AppError> {
    Ok(bridge::create_from_args(&state, request).await)
}

#[tauri::command]
pub fn is_pinned(state: State<'_, Arc<ShortcutService>>, id: String) -> Result<bool, AppError> {
    Ok(state.is_pinned(&id))
}
