//! 点击事件模型与出站载荷。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::intent::{EXTRA_SHORTCUT_DATA, LaunchIntent};

/// 一次“通过快捷方式启动”对应的点击事件。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub id: String,
    /// 附加数据解码结果；缺失或无法解码时为 `None`。
    pub extra_data: Option<Value>,
}

/// 发往应用层的 `onShortcutClick` 载荷。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutClickPayload {
    pub shortcut_id: String,
    pub shortcut_data: String,
}

impl ClickEvent {
    /// 从启动意图解码点击事件；不是快捷方式启动时返回 `None`。
    ///
    /// 附加数据解码失败不会让事件失败，只会得到空载荷。
    pub fn from_intent(intent: &LaunchIntent) -> Option<Self> {
        let id = intent.shortcut_id()?;
        let extra_data = intent
            .extra(EXTRA_SHORTCUT_DATA)
            .and_then(|raw| decode_payload(id, raw));

        Some(Self {
            id: id.to_string(),
            extra_data,
        })
    }

    pub fn to_wire(&self) -> ShortcutClickPayload {
        let shortcut_data = match &self.extra_data {
            Some(value) => value.to_string(),
            None => String::new(),
        };

        ShortcutClickPayload {
            shortcut_id: self.id.clone(),
            shortcut_data,
        }
    }
}

fn decode_payload(id: &str, raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("⚠️ 快捷方式附加数据无法解码，按空载荷处理 - id: {} ({})", id, err);
            None
        }
    }
}
