//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSourceKind` 表示外部来源语义
//! - `RawImageData` 表示已加载但未解码的字节
//! - `Drawable` / `ResolvedIcon` 表示解析完成、可交给合成器或注册器的图标

use std::fmt;
use std::str::FromStr;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use super::IconError;

/// 图标输入来源类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSourceKind {
    /// 应用打包素材中的相对路径。
    Asset,
    /// 平台 drawable 资源名（不含扩展名）。
    Resource,
    /// 远程地址；进入解析器前已被下载为本地文件。
    Network,
    /// 本地绝对路径。
    File,
}

impl ImageSourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Resource => "resource",
            Self::Network => "network",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ImageSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSourceKind {
    type Err = IconError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "resource" => Ok(Self::Resource),
            "network" => Ok(Self::Network),
            "file" => Ok(Self::File),
            other => Err(IconError::InvalidFormat(format!(
                "未知图片来源类型：{}（可选：asset / resource / network / file）",
                other
            ))),
        }
    }
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 可绘制内容。
///
/// `Solid` 没有固有尺寸，绘制时铺满目标区域（对应平台的纯色 drawable）。
#[derive(Debug, Clone)]
pub enum Drawable {
    Bitmap(RgbaImage),
    Solid(Rgba<u8>),
}

/// 平台资源句柄。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub id: u32,
    pub name: String,
}

/// 解析完成的图标。
///
/// 只在一次创建流程内存活，交给合成器或注册器后即被消费。
#[derive(Debug, Clone)]
pub struct ResolvedIcon {
    pub drawable: Drawable,
    /// 来自平台资源时保留的资源句柄。
    pub resource: Option<ResourceRef>,
    pub source_hint: &'static str,
}

impl ResolvedIcon {
    pub fn from_bitmap(bitmap: RgbaImage, source_hint: &'static str) -> Self {
        Self {
            drawable: Drawable::Bitmap(bitmap),
            resource: None,
            source_hint,
        }
    }

    /// 固有尺寸；纯色 drawable 为 `(0, 0)`。
    pub fn dimensions(&self) -> (u32, u32) {
        match &self.drawable {
            Drawable::Bitmap(bitmap) => bitmap.dimensions(),
            Drawable::Solid(_) => (0, 0),
        }
    }

    /// 固有尺寸为零时视为退化图标，合成时按铺满画布的占位处理。
    pub fn is_degenerate(&self) -> bool {
        let (width, height) = self.dimensions();
        width == 0 || height == 0
    }

    pub fn bitmap(&self) -> Option<&RgbaImage> {
        match &self.drawable {
            Drawable::Bitmap(bitmap) => Some(bitmap),
            Drawable::Solid(_) => None,
        }
    }
}
