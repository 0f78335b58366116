//! 创建请求模型。

use crate::error::AppError;
use crate::icon::ImageSourceKind;

/// 自适应图标背景：纯色或图片二选一。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptiveBackground {
    /// 颜色字符串（`#RRGGBB`、颜色名等），无法解析时按透明处理。
    Color(String),
    /// 图片来源，与主图标使用相同的来源类型。
    Image(String),
}

/// 自适应图标参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveIcon {
    pub foreground: String,
    /// `None` 表示背景完全透明。
    pub background: Option<AdaptiveBackground>,
}

/// 一次固定快捷方式创建请求。
///
/// `id` 是账本与平台快捷方式命名空间中唯一的身份键，重复使用会覆盖两侧记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutRequest {
    pub id: String,
    pub label: String,
    pub long_label: Option<String>,
    pub image_source: String,
    pub image_source_kind: ImageSourceKind,
    /// 调用方序列化好的附加数据，原样随启动意图回传。
    pub extra_data: Option<String>,
    pub adaptive: Option<AdaptiveIcon>,
}

impl ShortcutRequest {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        image_source: impl Into<String>,
        image_source_kind: ImageSourceKind,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            long_label: None,
            image_source: image_source.into(),
            image_source_kind,
            extra_data: None,
            adaptive: None,
        }
    }

    pub fn with_long_label(mut self, long_label: impl Into<String>) -> Self {
        self.long_label = Some(long_label.into());
        self
    }

    pub fn with_extra_data(mut self, extra_data: impl Into<String>) -> Self {
        self.extra_data = Some(extra_data.into());
        self
    }

    pub fn with_adaptive(
        mut self,
        foreground: impl Into<String>,
        background: Option<AdaptiveBackground>,
    ) -> Self {
        self.adaptive = Some(AdaptiveIcon {
            foreground: foreground.into(),
            background,
        });
        self
    }

    /// 长标签，未提供或为空时回退到短标签。
    pub fn long_label(&self) -> &str {
        match self.long_label.as_deref() {
            Some(long) if !long.is_empty() => long,
            _ => &self.label,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.id.trim().is_empty() {
            return Err(AppError::InvalidArgument("快捷方式 id 不能为空".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_label_defaults_to_label() {
        let request = ShortcutRequest::new("a", "News", "icon.png", ImageSourceKind::Asset);
        assert_eq!(request.long_label(), "News");

        let request = request.with_long_label("");
        assert_eq!(request.long_label(), "News");

        let request = request.with_long_label("Today's news");
        assert_eq!(request.long_label(), "Today's news");
    }

    #[test]
    fn blank_id_is_rejected() {
        let request = ShortcutRequest::new("  ", "News", "icon.png", ImageSourceKind::Asset);
        assert!(matches!(request.validate(), Err(AppError::InvalidArgument(_))));
    }
}
