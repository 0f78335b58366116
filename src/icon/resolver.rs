//! # 图标解析模块
//!
//! ## 设计思路
//!
//! `IconResolver` 负责把“来源字符串 + 来源类型”变成 `ResolvedIcon`：
//! - Asset：经素材读取器取字节，再走解码流水线
//! - Resource：按名称在资源表中查找句柄，不做显式解码
//! - File / Network：检查存在性后读取本地文件并解码（Network 在进入这里之前已被下载）
//!
//! ## 实现思路
//!
//! 所有读取与解码都是阻塞操作，由上层编排器放进 `spawn_blocking` 执行。
//! 不存在 → `NotFound`，字节无法解码 → `Decode`，其余错误原样上抛。

use std::path::Path;
use std::sync::Arc;

use super::source::RawImageData;
use super::{
    AssetReader, IconError, ImageSourceKind, ResolvedIcon, ResourceRef, ResourceTable,
};
use crate::config::ShortcutConfig;

/// 图标解析器。
pub struct IconResolver {
    pub(super) assets: Arc<dyn AssetReader>,
    pub(super) resources: Arc<dyn ResourceTable>,
    pub(super) config: ShortcutConfig,
}

impl IconResolver {
    pub fn new(
        assets: Arc<dyn AssetReader>,
        resources: Arc<dyn ResourceTable>,
        config: ShortcutConfig,
    ) -> Self {
        Self {
            assets,
            resources,
            config,
        }
    }

    /// 按来源类型解析图标。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use pinned_shortcut::config::ShortcutConfig;
    /// use pinned_shortcut::icon::{DirAssetReader, IconResolver, ImageSourceKind, NoopResourceTable};
    ///
    /// let resolver = IconResolver::new(
    ///     Arc::new(DirAssetReader::new("assets")),
    ///     Arc::new(NoopResourceTable),
    ///     ShortcutConfig::default(),
    /// );
    /// let icon = resolver.resolve("icons/news.png", ImageSourceKind::Asset)?;
    /// # Ok::<(), pinned_shortcut::icon::IconError>(())
    /// ```
    pub fn resolve(&self, source: &str, kind: ImageSourceKind) -> Result<ResolvedIcon, IconError> {
        let icon = match kind {
            ImageSourceKind::Asset => self.load_from_asset(source)?,
            ImageSourceKind::Resource => self.load_from_resource(source)?,
            ImageSourceKind::Network | ImageSourceKind::File => self.load_from_file(source)?,
        };

        let (width, height) = icon.dimensions();
        log::debug!("图标解析完成 - 类型: {} 尺寸: {}x{}", kind, width, height);
        Ok(icon)
    }

    fn load_from_asset(&self, path: &str) -> Result<ResolvedIcon, IconError> {
        log::debug!("📦 读取素材图标 - 路径: {}", path);

        let bytes = self.assets.read(path)?;
        let bitmap = self.decode_icon(RawImageData {
            bytes,
            source_hint: "asset",
        })?;
        Ok(ResolvedIcon::from_bitmap(bitmap, "asset"))
    }

    fn load_from_resource(&self, name: &str) -> Result<ResolvedIcon, IconError> {
        log::debug!("🎨 查找资源图标 - 名称: {}", name);

        let id = self
            .resources
            .drawable_id(name)
            .ok_or_else(|| IconError::NotFound(format!("资源不存在：{}", name)))?;
        let drawable = self.resources.load_drawable(id)?;

        Ok(ResolvedIcon {
            drawable,
            resource: Some(ResourceRef {
                id,
                name: name.to_string(),
            }),
            source_hint: "resource",
        })
    }

    fn load_from_file(&self, path: &str) -> Result<ResolvedIcon, IconError> {
        log::debug!("📁 读取本地图标 - 路径: {}", path);

        let file_path = Path::new(path);
        if path.trim().is_empty() || !file_path.is_file() {
            return Err(IconError::NotFound(format!("文件不存在：{}", path)));
        }

        let metadata = std::fs::metadata(file_path)
            .map_err(|e| IconError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > self.config.max_file_size {
            return Err(IconError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                self.config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(file_path)
            .map_err(|e| IconError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        let bitmap = self.decode_icon(RawImageData {
            bytes,
            source_hint: "file",
        })?;
        Ok(ResolvedIcon::from_bitmap(bitmap, "file"))
    }
}

