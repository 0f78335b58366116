//! # 自适应图标合成模块
//!
//! ## 设计思路
//!
//! 在固定尺寸的正方形画布上叠加两层：
//! 1. 背景层铺满画布：纯色填充，或背景图居中裁切为正方形后缩放到画布尺寸
//! 2. 前景层按固有尺寸居中绘制；固有尺寸为零时铺满画布作为占位
//!
//! 未指定背景时画布保持完全透明。
//!
//! ## 实现思路
//!
//! 合成是纯 CPU 操作，不做 I/O；失败时返回 `IconError::Composition`，
//! 由编排器降级为“只用前景图标”。

use image::imageops;
use image::{Rgba, RgbaImage};

use super::color::TRANSPARENT;
use super::pipeline::resize_rgba;
use super::{Drawable, IconError, ResolvedIcon};

/// 平台标准自适应图标尺寸（108dp × 4 密度）。
pub const ADAPTIVE_ICON_SIZE: u32 = 432;

/// 背景层。
#[derive(Debug, Clone, Copy)]
pub enum BackgroundLayer<'a> {
    Transparent,
    Color(Rgba<u8>),
    Image(&'a ResolvedIcon),
}

/// 自适应图标合成器。
#[derive(Debug, Clone)]
pub struct AdaptiveIconComposer {
    canvas_size: u32,
}

impl Default for AdaptiveIconComposer {
    fn default() -> Self {
        Self {
            canvas_size: ADAPTIVE_ICON_SIZE,
        }
    }
}

impl AdaptiveIconComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    /// 合成前景与背景。
    ///
    /// # 示例
    /// ```rust
    /// use image::{Rgba, RgbaImage};
    /// use pinned_shortcut::icon::{AdaptiveIconComposer, BackgroundLayer, ResolvedIcon};
    ///
    /// let composer = AdaptiveIconComposer::new();
    /// let foreground = ResolvedIcon::from_bitmap(RgbaImage::from_pixel(64, 64, Rgba([0, 0, 255, 255])), "doc");
    /// let icon = composer.compose(&foreground, BackgroundLayer::Color(Rgba([255, 0, 0, 255])))?;
    /// assert_eq!(icon.dimensions(), (composer.canvas_size(), composer.canvas_size()));
    /// # Ok::<(), pinned_shortcut::icon::IconError>(())
    /// ```
    pub fn compose(
        &self,
        foreground: &ResolvedIcon,
        background: BackgroundLayer<'_>,
    ) -> Result<RgbaImage, IconError> {
        let size = self.canvas_size;
        if size == 0 {
            return Err(IconError::Composition("画布尺寸为零".to_string()));
        }

        let mut canvas = match background {
            BackgroundLayer::Transparent => RgbaImage::from_pixel(size, size, TRANSPARENT),
            BackgroundLayer::Color(color) => RgbaImage::from_pixel(size, size, color),
            BackgroundLayer::Image(icon) => self.background_from_icon(icon)?,
        };

        self.draw_foreground(&mut canvas, foreground);

        log::debug!(
            "🧩 自适应图标合成完成 - 画布: {}x{} 前景: {:?}",
            size,
            size,
            foreground.dimensions()
        );
        Ok(canvas)
    }

    fn background_from_icon(&self, icon: &ResolvedIcon) -> Result<RgbaImage, IconError> {
        let size = self.canvas_size;
        match &icon.drawable {
            Drawable::Solid(color) => Ok(RgbaImage::from_pixel(size, size, *color)),
            Drawable::Bitmap(bitmap) if bitmap.width() == 0 || bitmap.height() == 0 => Err(
                IconError::Composition("背景图尺寸为零，无法缩放".to_string()),
            ),
            Drawable::Bitmap(bitmap) => Ok(cover_square(bitmap, size)),
        }
    }

    fn draw_foreground(&self, canvas: &mut RgbaImage, foreground: &ResolvedIcon) {
        let size = self.canvas_size;
        match &foreground.drawable {
            Drawable::Bitmap(bitmap) if !foreground.is_degenerate() => {
                let x = (size as i64 - bitmap.width() as i64) / 2;
                let y = (size as i64 - bitmap.height() as i64) / 2;
                imageops::overlay(canvas, bitmap, x, y);
            }
            Drawable::Bitmap(_) => {
                log::debug!("前景图固有尺寸为零，按透明占位铺满画布");
            }
            Drawable::Solid(color) => {
                let layer = RgbaImage::from_pixel(size, size, *color);
                imageops::overlay(canvas, &layer, 0, 0);
            }
        }
    }
}

/// 居中裁切为正方形后缩放到 `size × size`。
fn cover_square(bitmap: &RgbaImage, size: u32) -> RgbaImage {
    let (width, height) = bitmap.dimensions();
    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;

    let square = imageops::crop_imm(bitmap, x, y, side, side).to_image();
    resize_rgba(&square, size, size)
}
