mod common;

use common::{Harness, create_png_bytes, solid_png_bytes};
use image::Rgba;
use pinned_shortcut::icon::{ADAPTIVE_ICON_SIZE, Drawable, ImageSourceKind};
use pinned_shortcut::ledger::KeyValueStore;
use pinned_shortcut::shortcut::{AdaptiveBackground, ShortcutIcon, ShortcutRequest};

const MODERN_API: u32 = 33;
const LEGACY_API: u32 = 23;

fn asset_request(id: &str, label: &str) -> ShortcutRequest {
    ShortcutRequest::new(id, label, "icons/main.png", ImageSourceKind::Asset)
}

#[tokio::test]
async fn asset_shortcut_is_pinned_and_recorded() {
    let h = Harness::new("reg-asset", MODERN_API);
    h.asset("icons/main.png", &create_png_bytes(64, 64));

    let request = asset_request("news", "News").with_extra_data(r#"{"tab":"top"}"#);
    assert!(h.service.create_pinned_shortcut(request).await);

    assert!(h.service.is_pinned("news"));
    assert_eq!(h.launcher.dynamic_ids(), vec!["news".to_string()]);
    let pinned = h.launcher.pinned("news").expect("pinned on launcher");
    assert_eq!(pinned.long_label, "News");
    assert!(matches!(pinned.icon, ShortcutIcon::Bitmap(ref b) if b.dimensions() == (64, 64)));

    let entry = h.service.ledger().get("news").expect("ledger read").expect("entry");
    assert_eq!(entry.extra_data.as_deref(), Some(r#"{"tab":"top"}"#));
}

#[tokio::test]
async fn failed_network_download_returns_false_without_ledger_entry() {
    let h = Harness::new("reg-net-fail", MODERN_API);
    let request = ShortcutRequest::new(
        "remote",
        "Remote",
        "https://example.com/missing.png",
        ImageSourceKind::Network,
    );

    assert!(!h.service.create_pinned_shortcut(request).await);
    assert!(h.service.ledger().get("remote").expect("ledger read").is_none());
    assert!(h.store.get("pinned_shortcuts").expect("store read").is_none());
    assert_eq!(h.launcher.pin_request_count(), 0);
}

#[tokio::test]
async fn network_source_is_staged_then_resolved_as_file() {
    let h = Harness::new("reg-net-ok", MODERN_API);
    let staged = h.file("staged/remote.png", &create_png_bytes(30, 30));
    h.fetcher.route("https://example.com/icon.png", staged.into());

    let request = ShortcutRequest::new(
        "remote",
        "Remote",
        "https://example.com/icon.png",
        ImageSourceKind::Network,
    );
    assert!(h.service.create_pinned_shortcut(request).await);
    assert_eq!(
        h.fetcher.calls(),
        vec![("https://example.com/icon.png".to_string(), "remote".to_string())]
    );
}

#[tokio::test]
async fn legacy_platform_answers_is_pinned_from_ledger() {
    let h = Harness::new("reg-legacy", LEGACY_API);
    h.asset("icons/main.png", &create_png_bytes(48, 48));

    assert_eq!(h.service.capability_name(), "compat");
    assert!(h.service.create_pinned_shortcut(asset_request("x", "X")).await);

    assert!(h.launcher.dynamic_ids().is_empty());
    assert!(h.service.is_pinned("x"));
    assert!(!h.service.is_pinned("never-created"));
}

#[tokio::test]
async fn same_id_twice_keeps_one_entry_with_latest_label() {
    let h = Harness::new("reg-overwrite", MODERN_API);
    h.asset("icons/main.png", &create_png_bytes(32, 32));

    assert!(h.service.create_pinned_shortcut(asset_request("x", "First")).await);
    assert!(h.service.create_pinned_shortcut(asset_request("x", "Second")).await);

    let entries = h.service.ledger().entries().expect("ledger entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "Second");
    assert_eq!(h.launcher.pinned("x").map(|d| d.short_label), Some("Second".to_string()));
}

#[tokio::test]
async fn declined_pin_still_leaves_ledger_entry() {
    let h = Harness::new("reg-declined", MODERN_API);
    h.asset("icons/main.png", &create_png_bytes(32, 32));
    h.launcher.set_accept_pins(false);

    assert!(!h.service.create_pinned_shortcut(asset_request("x", "X")).await);

    assert!(h.launcher.pinned("x").is_none());
    assert!(h.service.ledger().get("x").expect("ledger read").is_some());
    assert!(h.service.is_pinned("x"));
}

#[tokio::test]
async fn dynamic_registration_failure_is_not_fatal() {
    let h = Harness::new("reg-dynamic", MODERN_API);
    h.asset("icons/main.png", &create_png_bytes(32, 32));
    h.launcher.set_fail_dynamic(true);

    let report = h
        .service
        .register(asset_request("x", "X"))
        .await
        .expect("register");
    assert!(report.pinned);
    assert!(!report.dynamic_registered);
    assert!(h.launcher.pinned("x").is_some());
}

#[tokio::test]
async fn missing_icon_aborts_before_ledger() {
    let h = Harness::new("reg-missing", MODERN_API);

    assert!(!h.service.create_pinned_shortcut(asset_request("x", "X")).await);
    assert!(h.service.ledger().is_empty().expect("ledger read"));
    assert_eq!(h.launcher.pin_request_count(), 0);
}

#[tokio::test]
async fn unsupported_launcher_returns_false() {
    let h = Harness::new("reg-unsupported", MODERN_API);
    h.asset("icons/main.png", &create_png_bytes(32, 32));
    h.launcher.set_native_pin_supported(false);

    assert!(!h.service.is_supported());
    assert!(!h.service.create_pinned_shortcut(asset_request("x", "X")).await);
    assert_eq!(h.launcher.pin_request_count(), 0);

    // 账本先于固定结果写入，不支持固定时同样留下记录
    assert!(h.service.ledger().get("x").expect("ledger read").is_some());
    assert!(h.service.is_pinned("x"));
}

fn network_adaptive_request(background: Option<AdaptiveBackground>) -> ShortcutRequest {
    ShortcutRequest::new("n", "N", "https://example.com/main.png", ImageSourceKind::Network)
        .with_adaptive("https://example.com/fg.png", background)
}

#[tokio::test]
async fn network_adaptive_layers_are_staged_with_layer_ids() {
    let h = Harness::new("reg-net-adaptive", MODERN_API);
    let main = h.file("staged/main.png", &create_png_bytes(40, 40));
    let fg = h.file("staged/fg.png", &solid_png_bytes(100, 100, [0, 0, 255, 255]));
    let bg = h.file("staged/bg.png", &solid_png_bytes(10, 10, [0, 255, 0, 255]));
    h.fetcher.route("https://example.com/main.png", main.into());
    h.fetcher.route("https://example.com/fg.png", fg.into());
    h.fetcher.route("https://example.com/bg.png", bg.into());

    let request = network_adaptive_request(Some(AdaptiveBackground::Image(
        "https://example.com/bg.png".into(),
    )));
    let report = h.service.register(request).await.expect("register");

    assert!(report.pinned);
    assert_eq!(report.icon_kind, "adaptive");
    assert!(!report.icon_degraded);
    assert_eq!(
        h.fetcher.calls(),
        vec![
            ("https://example.com/main.png".to_string(), "n".to_string()),
            ("https://example.com/fg.png".to_string(), "n_foreground".to_string()),
            ("https://example.com/bg.png".to_string(), "n_background".to_string()),
        ]
    );
    let bitmap = h.launcher.pinned("n").expect("pinned").icon.bitmap().cloned().expect("bitmap");
    assert_eq!(*bitmap.get_pixel(0, 0), Rgba([0, 255, 0, 255]));
}

#[tokio::test]
async fn network_background_download_failure_falls_back_to_foreground() {
    let h = Harness::new("reg-net-adaptive-bg", MODERN_API);
    let main = h.file("staged/main.png", &create_png_bytes(40, 40));
    let fg = h.file("staged/fg.png", &create_png_bytes(100, 80));
    h.fetcher.route("https://example.com/main.png", main.into());
    h.fetcher.route("https://example.com/fg.png", fg.into());

    let request = network_adaptive_request(Some(AdaptiveBackground::Image(
        "https://example.com/bg.png".into(),
    )));
    let report = h.service.register(request).await.expect("register");

    assert!(report.pinned);
    assert!(report.icon_degraded);
    assert_eq!(report.icon_kind, "bitmap");
    assert_eq!(h.fetcher.calls().len(), 3);
    let descriptor = h.launcher.pinned("n").expect("pinned");
    assert_eq!(descriptor.icon.bitmap().map(|b| b.dimensions()), Some((100, 80)));
    assert!(h.service.ledger().get("n").expect("ledger read").is_some());
}

#[tokio::test]
async fn network_foreground_download_failure_falls_back_to_main_icon() {
    let h = Harness::new("reg-net-adaptive-fg", MODERN_API);
    let main = h.file("staged/main.png", &create_png_bytes(40, 40));
    h.fetcher.route("https://example.com/main.png", main.into());

    let request = network_adaptive_request(Some(AdaptiveBackground::Color("#FF0000".into())));
    let report = h.service.register(request).await.expect("register");

    assert!(report.pinned);
    assert!(report.icon_degraded);
    assert_eq!(h.fetcher.calls().len(), 2);
    let descriptor = h.launcher.pinned("n").expect("pinned");
    assert_eq!(descriptor.icon.bitmap().map(|b| b.dimensions()), Some((40, 40)));
}

#[tokio::test]
async fn adaptive_icon_is_composed_at_canonical_size() {
    let h = Harness::new("reg-adaptive", MODERN_API);
    h.asset("icons/main.png", &create_png_bytes(32, 32));
    h.asset("icons/fg.png", &solid_png_bytes(100, 100, [0, 0, 255, 255]));

    let request = asset_request("x", "X")
        .with_adaptive("icons/fg.png", Some(AdaptiveBackground::Color("#FF0000".into())));
    let report = h.service.register(request).await.expect("register");

    assert_eq!(report.icon_kind, "adaptive");
    assert!(!report.icon_degraded);
    let descriptor = h.launcher.pinned("x").expect("pinned");
    let bitmap = descriptor.icon.bitmap().expect("bitmap icon");
    assert_eq!(bitmap.dimensions(), (ADAPTIVE_ICON_SIZE, ADAPTIVE_ICON_SIZE));
    assert_eq!(*bitmap.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    let center = ADAPTIVE_ICON_SIZE / 2;
    assert_eq!(*bitmap.get_pixel(center, center), Rgba([0, 0, 255, 255]));
}

#[tokio::test]
async fn adaptive_background_failure_falls_back_to_foreground() {
    let h = Harness::new("reg-adaptive-bg", MODERN_API);
    h.asset("icons/main.png", &create_png_bytes(32, 32));
    h.asset("icons/fg.png", &create_png_bytes(100, 80));

    let request = asset_request("x", "X").with_adaptive(
        "icons/fg.png",
        Some(AdaptiveBackground::Image("icons/missing-bg.png".into())),
    );
    let report = h.service.register(request).await.expect("register");

    assert!(report.pinned);
    assert!(report.icon_degraded);
    assert_eq!(report.icon_kind, "bitmap");
    let descriptor = h.launcher.pinned("x").expect("pinned");
    assert_eq!(descriptor.icon.bitmap().map(|b| b.dimensions()), Some((100, 80)));
}

#[tokio::test]
async fn adaptive_foreground_failure_falls_back_to_main_icon() {
    let h = Harness::new("reg-adaptive-fg", MODERN_API);
    h.asset("icons/main.png", &create_png_bytes(40, 40));

    let request = asset_request("x", "X").with_adaptive("icons/missing-fg.png", None);
    let report = h.service.register(request).await.expect("register");

    assert!(report.pinned);
    assert!(report.icon_degraded);
    let descriptor = h.launcher.pinned("x").expect("pinned");
    assert_eq!(descriptor.icon.bitmap().map(|b| b.dimensions()), Some((40, 40)));
}

#[tokio::test]
async fn resource_icon_keeps_resource_handle() {
    let h = Harness::new("reg-resource", MODERN_API);
    let id = h.resources.insert(
        "ic_news",
        Drawable::Bitmap(image::RgbaImage::from_pixel(24, 24, Rgba([9, 9, 9, 255]))),
    );

    let request = ShortcutRequest::new("x", "X", "ic_news", ImageSourceKind::Resource);
    assert!(h.service.create_pinned_shortcut(request).await);

    match h.launcher.pinned("x").expect("pinned").icon {
        ShortcutIcon::Resource(resource) => assert_eq!(resource.id, id),
        other => panic!("expected resource icon, got {}", other.kind()),
    }
}

#[tokio::test]
async fn blank_id_is_rejected() {
    let h = Harness::new("reg-blank", MODERN_API);
    h.asset("icons/main.png", &create_png_bytes(8, 8));

    assert!(!h.service.create_pinned_shortcut(asset_request("", "X")).await);
    assert!(h.service.ledger().is_empty().expect("ledger read"));
}
