mod common;

use std::sync::Arc;

use common::{create_png_bytes, path_str, unique_temp_dir, write_file};
use image::Rgba;
use pinned_shortcut::config::ShortcutConfig;
use pinned_shortcut::icon::{
    DirAssetReader, DirResourceTable, Drawable, IconError, IconResolver, ImageSourceKind,
    MemoryResourceTable, NoopResourceTable, ResourceTable,
};

struct Fixture {
    dir: std::path::PathBuf,
    resolver: IconResolver,
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn fixture(tag: &str, resources: Arc<dyn ResourceTable>) -> Fixture {
    let dir = unique_temp_dir(tag);
    write_file(&dir.join("assets"), "icons/good.png", &create_png_bytes(48, 32));
    write_file(&dir.join("assets"), "icons/corrupt.png", b"not really a png");
    write_file(&dir, "good.png", &create_png_bytes(20, 40));
    write_file(&dir, "corrupt.png", b"\x89PNG\r\n\x1a\ntruncated");

    let resolver = IconResolver::new(
        Arc::new(DirAssetReader::new(dir.join("assets"))),
        resources,
        ShortcutConfig::default(),
    );
    Fixture { dir, resolver }
}

#[test]
fn asset_source_resolves_missing_and_corrupt() {
    let fx = fixture("resolver-asset", Arc::new(NoopResourceTable));

    let icon = fx
        .resolver
        .resolve("icons/good.png", ImageSourceKind::Asset)
        .expect("asset should resolve");
    assert_eq!(icon.dimensions(), (48, 32));

    let missing = fx.resolver.resolve("icons/nope.png", ImageSourceKind::Asset);
    assert!(matches!(missing, Err(IconError::NotFound(_))));

    let corrupt = fx.resolver.resolve("icons/corrupt.png", ImageSourceKind::Asset);
    assert!(matches!(corrupt, Err(IconError::Decode(_))));
}

#[test]
fn asset_paths_cannot_escape_bundle() {
    let fx = fixture("resolver-escape", Arc::new(NoopResourceTable));
    let escaped = fx.resolver.resolve("../good.png", ImageSourceKind::Asset);
    assert!(matches!(escaped, Err(IconError::NotFound(_))));
}

#[test]
fn file_and_network_sources_share_the_file_path() {
    let fx = fixture("resolver-file", Arc::new(NoopResourceTable));
    let good = path_str(&fx.dir.join("good.png"));
    let missing = path_str(&fx.dir.join("missing.png"));
    let corrupt = path_str(&fx.dir.join("corrupt.png"));

    for kind in [ImageSourceKind::File, ImageSourceKind::Network] {
        let icon = fx.resolver.resolve(&good, kind).expect("file should resolve");
        assert_eq!(icon.dimensions(), (20, 40));
        assert!(!icon.is_degenerate());

        assert!(matches!(fx.resolver.resolve(&missing, kind), Err(IconError::NotFound(_))));
        assert!(matches!(fx.resolver.resolve(&corrupt, kind), Err(IconError::Decode(_))));
    }
}

#[test]
fn memory_resource_resolves_to_handle() {
    let table = Arc::new(MemoryResourceTable::new());
    let bitmap = image::RgbaImage::from_pixel(24, 24, Rgba([0, 128, 0, 255]));
    let id = table.insert("ic_launcher", Drawable::Bitmap(bitmap));
    let fx = fixture("resolver-resource", table);

    let icon = fx
        .resolver
        .resolve("ic_launcher", ImageSourceKind::Resource)
        .expect("resource should resolve");
    assert_eq!(icon.dimensions(), (24, 24));
    let resource = icon.resource.expect("resource handle");
    assert_eq!(resource.id, id);
    assert_eq!(resource.name, "ic_launcher");

    let missing = fx.resolver.resolve("ic_missing", ImageSourceKind::Resource);
    assert!(matches!(missing, Err(IconError::NotFound(_))));
}

#[test]
fn directory_resource_table_decodes_on_load() {
    let res_dir = unique_temp_dir("resolver-res-dir");
    write_file(&res_dir, "ic_good.png", &create_png_bytes(16, 16));
    write_file(&res_dir, "ic_bad.png", b"garbage");
    write_file(&res_dir, "readme.txt", b"ignored");

    let table = DirResourceTable::scan(&res_dir).expect("scan resources");
    assert!(table.drawable_id("readme").is_none());
    let fx = fixture("resolver-res-table", Arc::new(table));

    let icon = fx
        .resolver
        .resolve("ic_good", ImageSourceKind::Resource)
        .expect("resource should resolve");
    assert_eq!(icon.dimensions(), (16, 16));

    let bad = fx.resolver.resolve("ic_bad", ImageSourceKind::Resource);
    assert!(matches!(bad, Err(IconError::Decode(_))));

    let _ = std::fs::remove_dir_all(res_dir);
}
