//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，各子模块的专用错误（图标链路的 `IconError`、
//! 平台调用的 `PlatformError`）通过 `From` 汇入这里。
//!
//! 对外的三个操作（`isSupported` / `createPinnedShortcut` / `isPinned`）只返回布尔值，
//! `AppError` 只在内部流转与日志中出现；跨调用边界时序列化为可读字符串。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `IconError` / `PlatformError` / `std::io::Error` 提供 `From` 转换，配合 `?` 使用。
//! - 实现 `Serialize` 将错误序列化为字符串，满足 IPC 返回要求。

use serde::Serialize;

use crate::icon::IconError;
use crate::platform::PlatformError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图标链路错误（加载 / 解码 / 合成 / 下载）
    #[error("{0}")]
    Icon(#[from] IconError),

    /// 当前平台不具备固定快捷方式能力
    #[error("平台不支持固定快捷方式: {0}")]
    Unsupported(String),

    /// 平台拒绝了动态注册或固定请求
    #[error("快捷方式注册失败: {0}")]
    Registration(String),

    /// 持久化存储读写失败
    #[error("存储错误: {0}")]
    Storage(String),

    /// 调用参数不合法
    #[error("参数错误: {0}")]
    InvalidArgument(String),

    /// 未知的调用方法
    #[error("未实现的方法: {0}")]
    NotImplemented(String),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PlatformError> for AppError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::Unavailable(msg) => AppError::Unsupported(msg),
            other => AppError::Registration(other.to_string()),
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        AppError::Storage(error.to_string())
    }
}

/// IPC 要求返回值实现 `Serialize`，这里序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_unavailable_maps_to_unsupported() {
        let err: AppError = PlatformError::Unavailable("api 21".to_string()).into();
        assert!(matches!(err, AppError::Unsupported(_)));

        let err: AppError = PlatformError::Rejected("rate limited".to_string()).into();
        assert!(matches!(err, AppError::Registration(_)));
    }

    #[test]
    fn serializes_as_display_string() {
        let err = AppError::InvalidArgument("id 不能为空".to_string());
        let json = serde_json::to_string(&err).expect("serialize error");
        assert_eq!(json, "\"参数错误: id 不能为空\"");
    }
}
