//! 启动意图模型：宿主进程被“点击固定快捷方式”拉起时携带的载荷。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 快捷方式启动动作名。
pub const ACTION_SHORTCUT_CLICK: &str = "pinned_shortcut.action.SHORTCUT_CLICK";
/// 启动载荷中保存快捷方式 id 的键。
pub const EXTRA_SHORTCUT_ID: &str = "shortcut_id";
/// 启动载荷中保存序列化附加数据的键。
pub const EXTRA_SHORTCUT_DATA: &str = "shortcut_data";

/// 不透明的启动意图：动作名 + 字符串键值对。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchIntent {
    pub action: String,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}

impl LaunchIntent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: BTreeMap::new(),
        }
    }

    /// 为快捷方式构造启动意图，`extra_data` 为调用方序列化好的附加数据。
    pub fn for_shortcut(id: &str, extra_data: Option<&str>) -> Self {
        let intent = Self::new(ACTION_SHORTCUT_CLICK).with_extra(EXTRA_SHORTCUT_ID, id);
        match extra_data {
            Some(data) => intent.with_extra(EXTRA_SHORTCUT_DATA, data),
            None => intent,
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    /// 携带的快捷方式 id；缺失或为空时返回 `None`。
    pub fn shortcut_id(&self) -> Option<&str> {
        self.extra(EXTRA_SHORTCUT_ID).filter(|id| !id.is_empty())
    }
}
