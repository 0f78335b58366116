//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图标链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配：
//! 解析层只关心 `NotFound` / `Decode`，合成层的 `Composition` 由编排器就地恢复。

/// 图标链路统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// 资源、素材或文件不存在
    #[error("未找到：{0}")]
    NotFound(String),

    /// 字节不是可解码的图片
    #[error("解码错误：{0}")]
    Decode(String),

    /// 输入格式不合法（URL、Content-Type 等）
    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("网络错误：{0}")]
    Network(String),

    #[error("超时错误：{0}")]
    Timeout(String),

    /// 自适应图标合成失败（由编排器降级处理，不会透出）
    #[error("合成错误：{0}")]
    Composition(String),
}

impl IconError {
    /// 是否属于“来源不存在”一类错误。
    pub fn is_not_found(&self) -> bool {
        matches!(self, IconError::NotFound(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, IconError::Decode(_))
    }
}
