//! # 素材与资源协作方
//!
//! ## 设计思路
//!
//! 图标来源中的“打包素材”和“平台资源”都由宿主提供，这里只定义最小接口：
//! - `AssetReader`：按相对路径读取素材字节
//! - `ResourceTable`：按资源名查找 drawable 句柄，再按句柄取出可绘制内容
//!
//! 同时提供目录实现（桌面调试、演示程序）与内存实现（测试、内嵌资源）。

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use super::pipeline::decode_icon_bytes;
use super::source::RawImageData;
use super::{Drawable, IconError};
use crate::config::ShortcutConfig;

/// 资源 id 起始值，与平台 drawable id 段保持一致的形态。
const RESOURCE_ID_BASE: u32 = 0x7f02_0000;

const RESOURCE_EXTENSIONS: [&str; 6] = ["png", "webp", "jpg", "jpeg", "gif", "bmp"];

/// 应用打包素材读取接口。
pub trait AssetReader: Send + Sync {
    /// 读取素材字节；路径不存在时返回 `IconError::NotFound`。
    fn read(&self, path: &str) -> Result<Vec<u8>, IconError>;
}

/// 平台 drawable 资源表。
pub trait ResourceTable: Send + Sync {
    /// 按资源名查找 id，未找到返回 `None`。
    fn drawable_id(&self, name: &str) -> Option<u32>;

    /// 按 id 取出可绘制内容。
    fn load_drawable(&self, id: u32) -> Result<Drawable, IconError>;
}

/// 没有任何素材的读取器。
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAssetReader;

impl AssetReader for NoopAssetReader {
    fn read(&self, path: &str) -> Result<Vec<u8>, IconError> {
        Err(IconError::NotFound(format!("素材不存在：{}", path)))
    }
}

/// 空资源表。
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResourceTable;

impl ResourceTable for NoopResourceTable {
    fn drawable_id(&self, _name: &str) -> Option<u32> {
        None
    }

    fn load_drawable(&self, id: u32) -> Result<Drawable, IconError> {
        Err(IconError::NotFound(format!("资源不存在：{:#x}", id)))
    }
}

/// 以目录作为素材包根目录的读取器。
///
/// 拒绝绝对路径与 `..`，保证读取范围不超出素材目录。
#[derive(Debug, Clone)]
pub struct DirAssetReader {
    root: PathBuf,
}

impl DirAssetReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.trim().is_empty() || escapes {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl AssetReader for DirAssetReader {
    fn read(&self, path: &str) -> Result<Vec<u8>, IconError> {
        let full_path = self
            .resolve(path)
            .ok_or_else(|| IconError::NotFound(format!("素材路径无效：{}", path)))?;

        if !full_path.is_file() {
            return Err(IconError::NotFound(format!("素材不存在：{}", path)));
        }

        std::fs::read(&full_path)
            .map_err(|e| IconError::FileSystem(format!("无法读取素材 {}：{}", path, e)))
    }
}

/// 以目录模拟 drawable 资源表：`<name>.<ext>` 文件即资源。
///
/// id 在构造时按文件名排序分配，进程内稳定。
/// 解码走与文件来源相同的像素/内存上限检查。
#[derive(Debug, Clone)]
pub struct DirResourceTable {
    entries: BTreeMap<String, PathBuf>,
    config: ShortcutConfig,
}

impl DirResourceTable {
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self, IconError> {
        let dir = dir.as_ref();
        let read_dir = std::fs::read_dir(dir).map_err(|e| {
            IconError::FileSystem(format!("无法读取资源目录 {}：{}", dir.display(), e))
        })?;

        let mut entries = BTreeMap::new();
        for entry in read_dir.flatten() {
            let path = entry.path();
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !RESOURCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                entries.entry(stem.to_string()).or_insert(path);
            }
        }

        log::debug!("资源目录扫描完成: {} 个 drawable", entries.len());
        Ok(Self {
            entries,
            config: ShortcutConfig::default(),
        })
    }

    /// 使用指定配置中的解码上限。
    pub fn with_config(mut self, config: ShortcutConfig) -> Self {
        self.config = config;
        self
    }
}

impl ResourceTable for DirResourceTable {
    fn drawable_id(&self, name: &str) -> Option<u32> {
        self.entries
            .keys()
            .position(|key| key == name)
            .map(|index| RESOURCE_ID_BASE + index as u32)
    }

    fn load_drawable(&self, id: u32) -> Result<Drawable, IconError> {
        let path = id
            .checked_sub(RESOURCE_ID_BASE)
            .and_then(|index| self.entries.values().nth(index as usize))
            .ok_or_else(|| IconError::NotFound(format!("资源不存在：{:#x}", id)))?;

        let bytes = std::fs::read(path).map_err(|e| {
            IconError::FileSystem(format!("读取资源失败 {}：{}", path.display(), e))
        })?;
        let bitmap = decode_icon_bytes(
            RawImageData {
                bytes,
                source_hint: "resource",
            },
            &self.config,
        )?;
        Ok(Drawable::Bitmap(bitmap))
    }
}

/// 内存资源表，按插入顺序分配 id。
#[derive(Debug, Default)]
pub struct MemoryResourceTable {
    entries: Mutex<Vec<(String, Drawable)>>,
}

impl MemoryResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册资源并返回其 id；同名资源会被替换。
    pub fn insert(&self, name: impl Into<String>, drawable: Drawable) -> u32 {
        let name = name.into();
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(index) = entries.iter().position(|(key, _)| *key == name) {
            entries[index].1 = drawable;
            return RESOURCE_ID_BASE + index as u32;
        }

        entries.push((name, drawable));
        RESOURCE_ID_BASE + (entries.len() - 1) as u32
    }
}

impl ResourceTable for MemoryResourceTable {
    fn drawable_id(&self, name: &str) -> Option<u32> {
        let entries = self.entries.lock().ok()?;
        entries
            .iter()
            .position(|(key, _)| key == name)
            .map(|index| RESOURCE_ID_BASE + index as u32)
    }

    fn load_drawable(&self, id: u32) -> Result<Drawable, IconError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| IconError::ResourceLimit("资源表锁已中毒".to_string()))?;

        id.checked_sub(RESOURCE_ID_BASE)
            .and_then(|index| entries.get(index as usize))
            .map(|(_, drawable)| drawable.clone())
            .ok_or_else(|| IconError::NotFound(format!("资源不存在：{:#x}", id)))
    }
}
