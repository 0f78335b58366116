//! # 服务层（宿主持有的状态对象）
//!
//! ## 设计思路
//!
//! `ShortcutService` 把图标解析器、下载器、能力实现、账本与点击分发器组装在一起，
//! 由宿主（插件入口、演示程序、测试）持有，替代进程级单例。
//! 平台能力在 `build()` 时按系统版本选择一次。
//!
//! ## 实现思路
//!
//! 对外暴露三个操作（`is_supported` / `create_pinned_shortcut` / `is_pinned`）
//! 与点击事件的两条投递入口；所有协作方都可以在构建器上替换。

use std::path::PathBuf;
use std::sync::Arc;

use crate::click::{ClickDispatcher, ClickEvent, EventBus, LaunchIntent, Subscription};
use crate::config::ShortcutConfig;
use crate::error::AppError;
use crate::icon::{
    AssetReader, HttpImageFetcher, IconResolver, NoopAssetReader, NoopResourceTable,
    RemoteImageFetcher, ResourceTable,
};
use crate::ledger::{KeyValueStore, MemoryKeyValueStore, PinnedLedger, SqliteKeyValueStore};
use crate::platform::{ShortcutHost, select_capability};
use crate::shortcut::{RegistrationReport, ShortcutRegistrar, ShortcutRequest};
use crate::storage::ledger_db_path;

/// 固定快捷方式服务。
pub struct ShortcutService {
    registrar: ShortcutRegistrar,
    dispatcher: Arc<ClickDispatcher>,
    ledger: Arc<PinnedLedger>,
}

impl ShortcutService {
    pub fn builder(host: Arc<dyn ShortcutHost>) -> ShortcutServiceBuilder {
        ShortcutServiceBuilder::new(host)
    }

    pub fn is_supported(&self) -> bool {
        self.registrar.is_supported()
    }

    pub async fn create_pinned_shortcut(&self, request: ShortcutRequest) -> bool {
        self.registrar.create_pinned_shortcut(request).await
    }

    /// 与 `create_pinned_shortcut` 相同的流程，但返回诊断结果。
    pub async fn register(&self, request: ShortcutRequest) -> Result<RegistrationReport, AppError> {
        self.registrar.register(request).await
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.registrar.is_pinned(id)
    }

    /// 进程启动时携带的意图。
    pub fn handle_initial_launch(&self, intent: &LaunchIntent) -> Option<ClickEvent> {
        self.dispatcher.handle_initial_launch(intent)
    }

    /// 运行中收到的新意图。
    pub fn handle_new_intent(&self, intent: &LaunchIntent) -> Option<ClickEvent> {
        self.dispatcher.handle_new_intent(intent)
    }

    pub fn subscribe_clicks(&self) -> Subscription<ClickEvent> {
        self.dispatcher.subscribe()
    }

    pub fn launch_click(&self) -> Option<ClickEvent> {
        self.dispatcher.launch_click()
    }

    pub fn dispatcher(&self) -> Arc<ClickDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn ledger(&self) -> Arc<PinnedLedger> {
        Arc::clone(&self.ledger)
    }

    pub fn capability_name(&self) -> &'static str {
        self.registrar.capability_name()
    }
}

/// 服务构建器。
pub struct ShortcutServiceBuilder {
    host: Arc<dyn ShortcutHost>,
    config: ShortcutConfig,
    assets: Arc<dyn AssetReader>,
    resources: Arc<dyn ResourceTable>,
    fetcher: Option<Arc<dyn RemoteImageFetcher>>,
    store: Option<Arc<dyn KeyValueStore>>,
    data_dir: Option<PathBuf>,
    click_bus: Option<Arc<EventBus<ClickEvent>>>,
}

impl ShortcutServiceBuilder {
    pub fn new(host: Arc<dyn ShortcutHost>) -> Self {
        Self {
            host,
            config: ShortcutConfig::default(),
            assets: Arc::new(NoopAssetReader),
            resources: Arc::new(NoopResourceTable),
            fetcher: None,
            store: None,
            data_dir: None,
            click_bus: None,
        }
    }

    pub fn config(mut self, config: ShortcutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn assets(mut self, assets: Arc<dyn AssetReader>) -> Self {
        self.assets = assets;
        self
    }

    pub fn resources(mut self, resources: Arc<dyn ResourceTable>) -> Self {
        self.resources = resources;
        self
    }

    /// 替换网络下载器；未设置时使用 `HttpImageFetcher`。
    pub fn fetcher(mut self, fetcher: Arc<dyn RemoteImageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// 指定账本存储；优先级高于 `data_dir`。
    pub fn ledger_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// 在该目录下用 SQLite 持久化账本。
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// 共享外部事件总线（例如插件层需要在服务构建前订阅）。
    pub fn click_bus(mut self, bus: Arc<EventBus<ClickEvent>>) -> Self {
        self.click_bus = Some(bus);
        self
    }

    pub fn build(self) -> Result<ShortcutService, AppError> {
        let store: Arc<dyn KeyValueStore> = match (self.store, self.data_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Arc::new(SqliteKeyValueStore::open(&ledger_db_path(&dir)?)?),
            (None, None) => {
                log::info!("📒 未指定数据目录，账本仅保存在内存中");
                Arc::new(MemoryKeyValueStore::new())
            }
        };

        let fetcher: Arc<dyn RemoteImageFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpImageFetcher::new(self.config.clone())?),
        };

        let resolver = Arc::new(IconResolver::new(
            self.assets,
            self.resources,
            self.config.clone(),
        ));
        let ledger = Arc::new(PinnedLedger::new(store, self.config.ledger_key.clone()));
        let capability = select_capability(self.host);
        let registrar = ShortcutRegistrar::new(resolver, fetcher, capability, Arc::clone(&ledger));
        let dispatcher = Arc::new(ClickDispatcher::new(
            self.click_bus.unwrap_or_else(|| Arc::new(EventBus::new())),
        ));

        Ok(ShortcutService {
            registrar,
            dispatcher,
            ledger,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::NoopImageFetcher;
    use crate::platform::InMemoryLauncher;

    #[test]
    fn builder_selects_capability_once() {
        let service = ShortcutService::builder(Arc::new(InMemoryLauncher::new(21)))
            .fetcher(Arc::new(NoopImageFetcher))
            .build()
            .expect("build service");
        assert_eq!(service.capability_name(), "compat");

        let service = ShortcutService::builder(Arc::new(InMemoryLauncher::new(33)))
            .fetcher(Arc::new(NoopImageFetcher))
            .build()
            .expect("build service");
        assert_eq!(service.capability_name(), "native");
    }

    #[test]
    fn custom_ledger_key_is_used() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut config = ShortcutConfig::default();
        config.ledger_key = "custom_key".to_string();

        let service = ShortcutService::builder(Arc::new(InMemoryLauncher::new(33)))
            .config(config)
            .fetcher(Arc::new(NoopImageFetcher))
            .ledger_store(store.clone())
            .build()
            .expect("build service");

        service
            .ledger()
            .record(crate::ledger::LedgerEntry::new("x", "X", "X", None))
            .expect("record");
        assert!(store.get("custom_key").expect("get").is_some());
        assert!(service.is_pinned("x"));
    }
}
