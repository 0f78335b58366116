//! # 解码与变换流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → RGBA”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素/内存上限快速拒绝
//! 3. 完整解码
//! 4. 超过图标单边上限时等比降采样
//!
//! 格式无法识别、header 损坏、解码失败统一归为 `IconError::Decode`。

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{GenericImageView, ImageReader, RgbaImage};
use std::io::Cursor;

use super::source::RawImageData;
use super::{IconError, IconResolver};
use crate::config::ShortcutConfig;

impl IconResolver {
    /// 将原始字节解码为 RGBA 位图。
    pub(crate) fn decode_icon(&self, raw: RawImageData) -> Result<RgbaImage, IconError> {
        decode_icon_bytes(raw, &self.config)
    }
}

pub(crate) fn decode_icon_bytes(
    raw: RawImageData,
    config: &ShortcutConfig,
) -> Result<RgbaImage, IconError> {
    if raw.bytes.is_empty() {
        return Err(IconError::Decode("图片内容为空".to_string()));
    }

    let (header_width, header_height) = inspect_dimensions_from_memory(&raw.bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;
    validate_decoded_memory_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(&raw.bytes)
        .map_err(|e| IconError::Decode(format!("图片解码失败：{}", e)))?;

    let (raw_width, raw_height) = decoded.dimensions();
    if raw_width == 0 || raw_height == 0 {
        return Err(IconError::Decode("图片尺寸为零".to_string()));
    }
    validate_pixel_limits(config, raw_width, raw_height)?;

    let rgba = decoded.to_rgba8();
    let prepared = maybe_downscale_icon(rgba, config.max_icon_dimension);
    let (width, height) = prepared.dimensions();

    log::debug!(
        "✅ 图标解码成功 - 来源: {} 原始尺寸: {}x{} 输出尺寸: {}x{}",
        raw.source_hint,
        raw_width,
        raw_height,
        width,
        height
    );

    Ok(prepared)
}

/// 仅通过内存中的图片头信息读取宽高。
///
/// 用于在完整解码前做像素限制检查。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), IconError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| IconError::Decode(format!("无法识别图片格式：{}", e)))?;

    if reader.format().is_none() {
        return Err(IconError::Decode("无法识别图片格式".to_string()));
    }

    reader
        .into_dimensions()
        .map_err(|e| IconError::Decode(format!("无法读取图片尺寸：{}", e)))
}

fn validate_pixel_limits(config: &ShortcutConfig, width: u32, height: u32) -> Result<(), IconError> {
    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| IconError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > config.max_decoded_pixels {
        return Err(IconError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    Ok(())
}

fn validate_decoded_memory_limits(
    config: &ShortcutConfig,
    width: u32,
    height: u32,
) -> Result<(), IconError> {
    let estimated = (width as u64)
        .checked_mul(height as u64)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| IconError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

    if estimated > config.max_decoded_bytes {
        return Err(IconError::ResourceLimit(format!(
            "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
            estimated as f64 / 1024.0 / 1024.0,
            config.max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    Ok(())
}

/// 单边超过上限时等比缩小，否则原样返回。
fn maybe_downscale_icon(image: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    if max_dimension == 0 || (width <= max_dimension && height <= max_dimension) {
        return image;
    }

    let scale = (max_dimension as f64 / width as f64).min(max_dimension as f64 / height as f64);
    let target_width = ((width as f64 * scale).floor() as u32).max(1);
    let target_height = ((height as f64 * scale).floor() as u32).max(1);

    log::info!(
        "🧩 图标降采样：{}x{} -> {}x{}",
        width,
        height,
        target_width,
        target_height
    );

    resize_rgba(&image, target_width, target_height)
}

/// 缩放 RGBA 位图，优先走 `fast_image_resize`，失败时回退 `image::imageops`。
pub(crate) fn resize_rgba(image: &RgbaImage, target_width: u32, target_height: u32) -> RgbaImage {
    let target_width = target_width.max(1);
    let target_height = target_height.max(1);
    if image.dimensions() == (target_width, target_height) {
        return image.clone();
    }

    match resize_with_fast_image_resize(image, target_width, target_height) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 imageops::resize：{}", err);
            image::imageops::resize(image, target_width, target_height, FilterType::Triangle)
        }
    }
}

fn resize_with_fast_image_resize(
    image: &RgbaImage,
    target_width: u32,
    target_height: u32,
) -> Result<RgbaImage, IconError> {
    let (src_width, src_height) = image.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        image.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| IconError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Bilinear));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| IconError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    RgbaImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| IconError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}
