//! 平台无关的快捷方式描述对象：每次创建构建一次，交给平台注册后即丢弃。

use image::RgbaImage;

use crate::click::LaunchIntent;
use crate::icon::{Drawable, ResolvedIcon, ResourceRef};

use super::ShortcutRequest;

/// 最终图标。
#[derive(Debug, Clone)]
pub enum ShortcutIcon {
    Bitmap(RgbaImage),
    /// 合成后的自适应图标，由平台施加遮罩与特效。
    AdaptiveBitmap(RgbaImage),
    /// 直接引用平台资源，不携带像素。
    Resource(ResourceRef),
}

impl ShortcutIcon {
    /// 解析结果转普通图标：资源保留句柄，其余取位图。
    pub fn from_resolved(icon: ResolvedIcon) -> Self {
        match (icon.resource, icon.drawable) {
            (Some(resource), _) => ShortcutIcon::Resource(resource),
            (None, Drawable::Bitmap(bitmap)) => ShortcutIcon::Bitmap(bitmap),
            (None, Drawable::Solid(color)) => {
                ShortcutIcon::Bitmap(RgbaImage::from_pixel(1, 1, color))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ShortcutIcon::Bitmap(_) => "bitmap",
            ShortcutIcon::AdaptiveBitmap(_) => "adaptive",
            ShortcutIcon::Resource(_) => "resource",
        }
    }

    pub fn bitmap(&self) -> Option<&RgbaImage> {
        match self {
            ShortcutIcon::Bitmap(bitmap) | ShortcutIcon::AdaptiveBitmap(bitmap) => Some(bitmap),
            ShortcutIcon::Resource(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShortcutDescriptor {
    pub id: String,
    pub short_label: String,
    pub long_label: String,
    pub icon: ShortcutIcon,
    pub launch: LaunchIntent,
}

impl ShortcutDescriptor {
    pub fn build(request: &ShortcutRequest, icon: ShortcutIcon) -> Self {
        Self {
            id: request.id.clone(),
            short_label: request.label.clone(),
            long_label: request.long_label().to_string(),
            icon,
            launch: LaunchIntent::for_shortcut(&request.id, request.extra_data.as_deref()),
        }
    }
}
