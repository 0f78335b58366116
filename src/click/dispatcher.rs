//! # 点击分发
//!
//! 两条投递路径（进程冷启动时的初始意图、运行中收到的新意图）
//! 都走同一个 `dispatch`，保证解码与发布行为一致。

use std::sync::{Arc, Mutex};

use super::{ClickEvent, EventBus, LaunchIntent, Subscription};

/// 点击分发器。
pub struct ClickDispatcher {
    bus: Arc<EventBus<ClickEvent>>,
    launch_click: Mutex<Option<ClickEvent>>,
}

impl Default for ClickDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(EventBus::new()))
    }
}

impl ClickDispatcher {
    pub fn new(bus: Arc<EventBus<ClickEvent>>) -> Self {
        Self {
            bus,
            launch_click: Mutex::new(None),
        }
    }

    /// 处理进程启动时携带的意图。
    pub fn handle_initial_launch(&self, intent: &LaunchIntent) -> Option<ClickEvent> {
        let event = self.dispatch(intent, "initial")?;
        match self.launch_click.lock() {
            Ok(mut guard) => *guard = Some(event.clone()),
            Err(_) => log::warn!("⚠️ 启动点击记录锁已中毒，跳过记录"),
        }
        Some(event)
    }

    /// 处理进程运行期间收到的新意图。
    pub fn handle_new_intent(&self, intent: &LaunchIntent) -> Option<ClickEvent> {
        self.dispatch(intent, "resumed")
    }

    /// 拉起本进程的那次点击（如有）。
    pub fn launch_click(&self) -> Option<ClickEvent> {
        self.launch_click.lock().ok().and_then(|guard| guard.clone())
    }

    pub fn subscribe(&self) -> Subscription<ClickEvent> {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> Arc<EventBus<ClickEvent>> {
        Arc::clone(&self.bus)
    }

    fn dispatch(&self, intent: &LaunchIntent, path: &'static str) -> Option<ClickEvent> {
        let event = ClickEvent::from_intent(intent)?;
        let delivered = self.bus.publish(event.clone());
        log::info!(
            "👆 快捷方式点击 - id: {} 路径: {} 订阅者: {}",
            event.id,
            path,
            delivered
        );
        Some(event)
    }
}
