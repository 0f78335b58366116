//! # 入站调用面
//!
//! ## 设计思路
//!
//! 应用层通过一个不透明的“同步请求 / 异步响应”通道调用本库，载荷只有字符串、映射与布尔值。
//! `MethodCall` 就是这条通道上的一次调用：方法名 + JSON 参数。
//!
//! ## 实现思路
//!
//! - 参数名使用 camelCase，与应用层保持一致。
//! - 未知方法返回 `NotImplemented`，载荷无法反序列化时返回 `InvalidArgument`。
//! - 三个操作本身只返回布尔值：字段取值不合法（空 id、未知来源类型等）
//!   与创建失败一样只记日志并返回 `false`。

use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::icon::ImageSourceKind;
use crate::service::ShortcutService;
use crate::shortcut::{AdaptiveBackground, ShortcutRequest};

pub const METHOD_IS_SUPPORTED: &str = "isSupported";
pub const METHOD_CREATE_PINNED_SHORTCUT: &str = "createPinnedShortcut";
pub const METHOD_IS_PINNED: &str = "isPinned";

/// 一次入站调用。
#[derive(Debug, Clone, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// `createPinnedShortcut` 的参数。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortcutArgs {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub long_label: Option<String>,
    pub image_source: String,
    #[serde(default)]
    pub image_source_kind: Option<String>,
    /// 序列化好的附加数据；传入结构化 JSON 时会被重新序列化。
    #[serde(default)]
    pub extra_data: Option<Value>,
    #[serde(default)]
    pub use_adaptive_icon: bool,
    #[serde(default)]
    pub adaptive_icon_foreground: Option<String>,
    #[serde(default)]
    pub adaptive_icon_background: Option<String>,
    #[serde(default)]
    pub adaptive_icon_background_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IsPinnedArgs {
    id: String,
}

impl CreateShortcutArgs {
    pub fn into_request(self) -> Result<ShortcutRequest, AppError> {
        let kind = match self.image_source_kind.as_deref() {
            None | Some("") => ImageSourceKind::Asset,
            Some(raw) => raw
                .parse::<ImageSourceKind>()
                .map_err(|e| AppError::InvalidArgument(e.to_string()))?,
        };

        let mut request = ShortcutRequest::new(self.id, self.label, self.image_source, kind);
        request.long_label = self.long_label;
        request.extra_data = match self.extra_data {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(raw),
            Some(other) => Some(other.to_string()),
        };

        if self.use_adaptive_icon {
            match self.adaptive_icon_foreground.filter(|fg| !fg.is_empty()) {
                Some(foreground) => {
                    let background = Self::parse_background(
                        self.adaptive_icon_background,
                        self.adaptive_icon_background_type.as_deref(),
                    )?;
                    request = request.with_adaptive(foreground, background);
                }
                None => log::warn!("⚠️ 启用了自适应图标但未提供前景，按普通图标处理"),
            }
        }

        request.validate()?;
        Ok(request)
    }

    fn parse_background(
        value: Option<String>,
        kind: Option<&str>,
    ) -> Result<Option<AdaptiveBackground>, AppError> {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        match kind.map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("color") => Ok(Some(AdaptiveBackground::Color(value))),
            Some("image") => Ok(Some(AdaptiveBackground::Image(value))),
            Some(other) => Err(AppError::InvalidArgument(format!(
                "未知的背景类型：{}",
                other
            ))),
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(method: &str, arguments: Value) -> Result<T, AppError> {
    serde_json::from_value(arguments)
        .map_err(|e| AppError::InvalidArgument(format!("{} 参数无效：{}", method, e)))
}

/// 按入站参数创建固定快捷方式；参数取值不合法时记日志并返回 `false`。
pub async fn create_from_args(service: &ShortcutService, args: CreateShortcutArgs) -> bool {
    let id = args.id.clone();
    match args.into_request() {
        Ok(request) => service.create_pinned_shortcut(request).await,
        Err(err) => {
            log::error!("❌ 创建固定快捷方式参数无效 - id: {:?} 原因: {}", id, err);
            false
        }
    }
}

/// 分发一次入站调用，返回 JSON 结果。
pub async fn handle_method_call(
    service: &ShortcutService,
    call: MethodCall,
) -> Result<Value, AppError> {
    log::debug!("📨 入站调用: {}", call.method);

    match call.method.as_str() {
        METHOD_IS_SUPPORTED => Ok(Value::Bool(service.is_supported())),
        METHOD_CREATE_PINNED_SHORTCUT => {
            let args: CreateShortcutArgs = parse_args(&call.method, call.arguments)?;
            Ok(Value::Bool(create_from_args(service, args).await))
        }
        METHOD_IS_PINNED => {
            let args: IsPinnedArgs = parse_args(&call.method, call.arguments)?;
            Ok(Value::Bool(service.is_pinned(&args.id)))
        }
        other => Err(AppError::NotImplemented(other.to_string())),
    }
}
