#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use pinned_shortcut::icon::{
    DirAssetReader, IconError, MemoryResourceTable, RemoteImageFetcher,
};
use pinned_shortcut::ledger::MemoryKeyValueStore;
use pinned_shortcut::platform::InMemoryLauncher;
use pinned_shortcut::service::ShortcutService;

pub fn unique_temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock error")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("pinned-shortcut-{tag}-{nanos}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
    });
    encode_png(&img)
}

pub fn solid_png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(width, height, Rgba(color)))
}

fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(&path, bytes).expect("write test file");
    path
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// 把 URL 映射到本地已有文件的下载器，未登记的 URL 视为下载失败。
#[derive(Default)]
pub struct MapFetcher {
    routes: Mutex<HashMap<String, PathBuf>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MapFetcher {
    pub fn route(&self, url: &str, path: PathBuf) {
        self.routes
            .lock()
            .expect("routes lock")
            .insert(url.to_string(), path);
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl RemoteImageFetcher for MapFetcher {
    async fn fetch(&self, url: &str, id: &str) -> Result<PathBuf, IconError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((url.to_string(), id.to_string()));
        self.routes
            .lock()
            .expect("routes lock")
            .get(url)
            .cloned()
            .ok_or_else(|| IconError::Network(format!("HTTP 404: {url}")))
    }
}

pub struct Harness {
    pub dir: PathBuf,
    pub launcher: Arc<InMemoryLauncher>,
    pub fetcher: Arc<MapFetcher>,
    pub resources: Arc<MemoryResourceTable>,
    pub store: Arc<MemoryKeyValueStore>,
    pub service: ShortcutService,
}

impl Harness {
    /// `assets/` 作为素材根目录的测试环境。
    pub fn new(tag: &str, api_level: u32) -> Self {
        Self::with_launcher(tag, Arc::new(InMemoryLauncher::new(api_level)))
    }

    pub fn with_launcher(tag: &str, launcher: Arc<InMemoryLauncher>) -> Self {
        let dir = unique_temp_dir(tag);
        let assets_dir = dir.join("assets");
        std::fs::create_dir_all(&assets_dir).expect("create assets dir");

        let fetcher = Arc::new(MapFetcher::default());
        let resources = Arc::new(MemoryResourceTable::new());
        let store = Arc::new(MemoryKeyValueStore::new());

        let service = ShortcutService::builder(launcher.clone())
            .assets(Arc::new(DirAssetReader::new(&assets_dir)))
            .resources(resources.clone())
            .fetcher(fetcher.clone())
            .ledger_store(store.clone())
            .build()
            .expect("build service");

        Self {
            dir,
            launcher,
            fetcher,
            resources,
            store,
            service,
        }
    }

    pub fn asset(&self, name: &str, bytes: &[u8]) {
        write_file(&self.dir.join("assets"), name, bytes);
    }

    pub fn file(&self, name: &str, bytes: &[u8]) -> String {
        path_str(&write_file(&self.dir, name, bytes))
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
