//! # 演示程序
//!
//! 在模拟启动器上走一遍完整流程：创建快捷方式 → 查询固定状态 → 模拟点击 → 打印点击事件。
//!
//! ```text
//! pinned-shortcut-demo <image-file> <id> <label> [extra-json]
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use pinned_shortcut::icon::{ImageSourceKind, NoopImageFetcher};
use pinned_shortcut::platform::InMemoryLauncher;
use pinned_shortcut::service::ShortcutService;
use pinned_shortcut::shortcut::ShortcutRequest;

const DEMO_API_LEVEL: u32 = 33;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (image, id, label) = match args.as_slice() {
        [image, id, label, ..] => (image.clone(), id.clone(), label.clone()),
        _ => {
            eprintln!("用法: pinned-shortcut-demo <image-file> <id> <label> [extra-json]");
            return ExitCode::from(2);
        }
    };
    let extra = args.get(3).cloned();

    let launcher = Arc::new(InMemoryLauncher::new(DEMO_API_LEVEL));
    let service = match ShortcutService::builder(launcher.clone())
        .fetcher(Arc::new(NoopImageFetcher))
        .build()
    {
        Ok(service) => service,
        Err(err) => {
            log::error!("❌ 服务初始化失败: {err}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("isSupported = {}", service.is_supported());

    let mut request = ShortcutRequest::new(id.clone(), label, image, ImageSourceKind::File);
    if let Some(extra) = extra {
        request = request.with_extra_data(extra);
    }

    let created = service.create_pinned_shortcut(request).await;
    log::info!("createPinnedShortcut = {}", created);
    log::info!("isPinned({}) = {}", id, service.is_pinned(&id));
    if !created {
        return ExitCode::FAILURE;
    }

    let mut clicks = service.subscribe_clicks();
    let Some(intent) = launcher.tap(&id) else {
        log::error!("❌ 启动器上找不到快捷方式: {id}");
        return ExitCode::FAILURE;
    };
    service.handle_new_intent(&intent);

    match clicks.try_recv() {
        Some(event) => match serde_json::to_string_pretty(&event.to_wire()) {
            Ok(json) => println!("onShortcutClick {json}"),
            Err(err) => log::error!("❌ 序列化点击事件失败: {err}"),
        },
        None => log::warn!("⚠️ 没有收到点击事件"),
    }

    ExitCode::SUCCESS
}
