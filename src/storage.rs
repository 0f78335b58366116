//! 存储目录管理模块
//!
//! # 设计思路
//!
//! 统一管理网络图标的暂存目录与账本数据库路径，支持自定义目录，
//! 并在目录不存在时自动创建。
//!
//! # 实现思路
//!
//! - 优先使用配置中的自定义目录。
//! - 未设置时回退到系统临时目录下的 `pinned-shortcut` 子目录。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// 账本数据库文件名。
pub const LEDGER_DB_FILE: &str = "shortcut_ledger.db";

const DEFAULT_DOWNLOAD_SUBDIR: &str = "pinned-shortcut";

/// 获取网络图标暂存目录
///
/// # 返回
/// - `Ok(PathBuf)` — 可用的暂存目录
/// - `Err(AppError::Storage)` — 无法创建目录
pub fn resolve_download_dir(custom_dir: Option<&str>) -> Result<PathBuf, AppError> {
    let dir = match custom_dir {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => std::env::temp_dir().join(DEFAULT_DOWNLOAD_SUBDIR),
    };

    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::Storage(format!("创建暂存目录 '{}' 失败: {}", dir.display(), e))
        })?;
    }
    Ok(dir)
}

/// 账本数据库路径（自动创建父目录）。
pub fn ledger_db_path(data_dir: &Path) -> Result<PathBuf, AppError> {
    fs::create_dir_all(data_dir).map_err(|e| {
        AppError::Storage(format!("创建数据目录 '{}' 失败: {}", data_dir.display(), e))
    })?;
    Ok(data_dir.join(LEDGER_DB_FILE))
}

/// 将快捷方式 id 转换为可安全用作文件名的片段。
pub(crate) fn sanitize_file_stem(id: &str) -> String {
    let stem: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .take(64)
        .collect();
    if stem.is_empty() { "shortcut".to_string() } else { stem }
}
