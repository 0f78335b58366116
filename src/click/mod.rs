//! # 点击分发模块（click）
//!
//! ## 设计思路
//!
//! 平台以“启动意图”告知本进程某个固定快捷方式被点击。本模块负责：
//! - `intent`：启动意图模型与约定的键名
//! - `event`：点击事件、附加数据解码、出站载荷
//! - `bus`：多订阅者事件总线
//! - `dispatcher`：冷启动 / 运行中两条投递路径的统一入口
//!
//! ## 实现思路
//!
//! ```text
//! 平台启动意图
//!    ├─ handle_initial_launch（冷启动）
//!    └─ handle_new_intent（运行中）
//!          ↓
//!      dispatch（解码 + 发布）
//!          ↓
//!      EventBus → 每个订阅者
//! ```

mod bus;
mod dispatcher;
mod event;
mod intent;

pub use bus::{EventBus, Subscription};
pub use dispatcher::ClickDispatcher;
pub use event::{ClickEvent, ShortcutClickPayload};
pub use intent::{ACTION_SHORTCUT_CLICK, EXTRA_SHORTCUT_DATA, EXTRA_SHORTCUT_ID, LaunchIntent};

/// 出站点击事件名。
pub const SHORTCUT_CLICK_EVENT: &str = "onShortcutClick";
