//! # 快捷方式注册编排
//!
//! ## 设计思路
//!
//! 每次创建请求走一遍固定的状态机：
//!
//! ```text
//! Start → ResolvingIcon → (Composing) → BuildingDescriptor
//!       → RegisteringDynamic → RequestingPin → Done
//! ```
//!
//! - 图标解析失败且没有可用的降级图标时终止（返回 false）
//! - 自适应合成失败降级为“只用前景”，前景也失败时再降级为主图标
//! - 网络来源中只有主图标下载失败是致命的，前景/背景下载失败走同样的降级
//! - 动态注册失败只记日志，继续发起固定请求
//! - 账本在描述对象构建完成后、固定结果返回前写入，被拒绝的固定也会留下记录
//!
//! ## 实现思路
//!
//! 网络来源先异步下载到本地，再把解码、合成、平台调用整体放进
//! `spawn_blocking`，不占用调度线程。同一 id 的并发请求不做串行化。

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::error::AppError;
use crate::icon::{
    AdaptiveIconComposer, BackgroundLayer, IconError, IconResolver, ImageSourceKind,
    RemoteImageFetcher, ResolvedIcon, parse_color,
};
use crate::ledger::{LedgerEntry, PinnedLedger};
use crate::platform::{PlatformError, ShortcutCapability};

use super::{AdaptiveBackground, AdaptiveIcon, ShortcutDescriptor, ShortcutIcon, ShortcutRequest};

/// 状态机阶段，仅用于日志与诊断。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStage {
    Start,
    ResolvingIcon,
    Composing,
    BuildingDescriptor,
    RegisteringDynamic,
    RequestingPin,
    Done,
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegistrationStage::Start => "Start",
            RegistrationStage::ResolvingIcon => "ResolvingIcon",
            RegistrationStage::Composing => "Composing",
            RegistrationStage::BuildingDescriptor => "BuildingDescriptor",
            RegistrationStage::RegisteringDynamic => "RegisteringDynamic",
            RegistrationStage::RequestingPin => "RequestingPin",
            RegistrationStage::Done => "Done",
        };
        f.write_str(name)
    }
}

/// 单次注册的诊断结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    /// 平台是否受理了固定请求，即对外返回的布尔值。
    pub pinned: bool,
    /// 最终图标类型：`bitmap` / `adaptive` / `resource`。
    pub icon_kind: &'static str,
    /// 请求了自适应图标但发生了降级。
    pub icon_degraded: bool,
    pub dynamic_registered: bool,
    pub ledger_recorded: bool,
}

/// 注册编排器。
#[derive(Clone)]
pub struct ShortcutRegistrar {
    resolver: Arc<IconResolver>,
    composer: AdaptiveIconComposer,
    fetcher: Arc<dyn RemoteImageFetcher>,
    capability: Arc<dyn ShortcutCapability>,
    ledger: Arc<PinnedLedger>,
}

impl ShortcutRegistrar {
    pub fn new(
        resolver: Arc<IconResolver>,
        fetcher: Arc<dyn RemoteImageFetcher>,
        capability: Arc<dyn ShortcutCapability>,
        ledger: Arc<PinnedLedger>,
    ) -> Self {
        Self {
            resolver,
            composer: AdaptiveIconComposer::default(),
            fetcher,
            capability,
            ledger,
        }
    }

    /// 创建固定快捷方式；仅当平台受理固定请求时返回 `true`。
    pub async fn create_pinned_shortcut(&self, request: ShortcutRequest) -> bool {
        let id = request.id.clone();
        match self.register(request).await {
            Ok(report) => report.pinned,
            Err(err) => {
                log::error!("❌ 创建固定快捷方式失败 - id: {} 原因: {}", id, err);
                false
            }
        }
    }

    /// 执行完整注册流程并返回诊断结果。
    pub async fn register(&self, request: ShortcutRequest) -> Result<RegistrationReport, AppError> {
        request.validate()?;
        log::debug!("➡️ [{}] 阶段: {}", request.id, RegistrationStage::Start);

        let (request, staging_degraded) = self.stage_network_sources(request).await?;

        let this = self.clone();
        tokio::task::spawn_blocking(move || this.register_blocking(&request, staging_degraded))
            .await
            .map_err(|e| AppError::Registration(format!("注册任务异常终止: {}", e)))?
    }

    /// 平台是否支持固定快捷方式。
    pub fn is_supported(&self) -> bool {
        self.capability.is_supported()
    }

    /// 快捷方式是否仍被固定：优先平台实时集合，找不到或无法查询时回退账本。
    pub fn is_pinned(&self, id: &str) -> bool {
        if let Some(ids) = self.capability.pinned_ids() {
            if ids.iter().any(|pinned| pinned == id) {
                return true;
            }
        }
        self.ledger.contains(id)
    }

    pub fn capability_name(&self) -> &'static str {
        self.capability.name()
    }

    /// 网络来源先下载为本地文件，之后统一按 `File` 解析。
    ///
    /// 主图标下载失败时终止；前景或背景下载失败只降级，
    /// 与本地来源解析失败时的降级路径一致。返回值第二项表示是否已降级。
    async fn stage_network_sources(
        &self,
        mut request: ShortcutRequest,
    ) -> Result<(ShortcutRequest, bool), AppError> {
        if request.image_source_kind != ImageSourceKind::Network {
            return Ok((request, false));
        }

        let fetch_start = Instant::now();
        let id = request.id.clone();
        request.image_source = self.stage(&request.image_source, &id).await?;
        request.image_source_kind = ImageSourceKind::File;

        let mut degraded = false;
        if let Some(adaptive) = request.adaptive.take() {
            match self.stage(&adaptive.foreground, &format!("{id}_foreground")).await {
                Ok(foreground) => {
                    let background = match adaptive.background {
                        Some(AdaptiveBackground::Image(source)) => self
                            .stage(&source, &format!("{id}_background"))
                            .await
                            .map(|path| Some(AdaptiveBackground::Image(path))),
                        other => Ok(other),
                    };
                    match background {
                        Ok(background) => {
                            request.adaptive = Some(AdaptiveIcon { foreground, background });
                        }
                        Err(err) => {
                            log::warn!("⚠️ 背景图下载失败，降级为前景图标 - id: {} 原因: {}", id, err);
                            request.image_source = foreground;
                            degraded = true;
                        }
                    }
                }
                Err(err) => {
                    log::warn!("⚠️ 前景图下载失败，降级为主图标 - id: {} 原因: {}", id, err);
                    degraded = true;
                }
            }
        }

        log::debug!("🌐 网络图标已暂存 - id: {} 耗时 {}ms", id, fetch_start.elapsed().as_millis());
        Ok((request, degraded))
    }

    async fn stage(&self, url: &str, staging_id: &str) -> Result<String, AppError> {
        let path = self.fetcher.fetch(url, staging_id).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    fn register_blocking(
        &self,
        request: &ShortcutRequest,
        staging_degraded: bool,
    ) -> Result<RegistrationReport, AppError> {
        let total_start = Instant::now();

        let icon_start = Instant::now();
        let (icon, icon_degraded) = self.build_icon(request)?;
        let icon_degraded = icon_degraded || staging_degraded;
        let icon_elapsed = icon_start.elapsed();

        log::debug!("➡️ [{}] 阶段: {}", request.id, RegistrationStage::BuildingDescriptor);
        let icon_kind = icon.kind();
        let descriptor = ShortcutDescriptor::build(request, icon);

        let ledger_recorded = match self.ledger.record(LedgerEntry::new(
            &request.id,
            &request.label,
            request.long_label(),
            request.extra_data.clone(),
        )) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("⚠️ 写入账本失败，继续注册 - id: {} 原因: {}", request.id, err);
                false
            }
        };

        log::debug!("➡️ [{}] 阶段: {}", request.id, RegistrationStage::RegisteringDynamic);
        let dynamic_start = Instant::now();
        let dynamic_registered = match self.capability.register_dynamic(&descriptor) {
            Ok(()) => true,
            Err(PlatformError::Unavailable(reason)) => {
                log::debug!("跳过动态注册：{}", reason);
                false
            }
            Err(err) => {
                log::warn!("⚠️ 动态注册失败，继续固定请求 - id: {} 原因: {}", request.id, err);
                false
            }
        };
        let dynamic_elapsed = dynamic_start.elapsed();

        log::debug!("➡️ [{}] 阶段: {}", request.id, RegistrationStage::RequestingPin);
        let pin_start = Instant::now();
        if !self.capability.is_supported() {
            return Err(AppError::Unsupported(format!(
                "启动器不支持固定快捷方式（{}）",
                self.capability.name()
            )));
        }
        let pinned = self.capability.request_pin(&descriptor)?;
        let pin_elapsed = pin_start.elapsed();

        if !pinned {
            log::warn!("⚠️ 平台未受理固定请求 - id: {}", request.id);
        }

        log::debug!("➡️ [{}] 阶段: {}", request.id, RegistrationStage::Done);
        log::info!(
            "✅ 快捷方式注册完成 - id: {} icon={} pinned={} icon={}ms dynamic={}ms pin={}ms total={}ms",
            request.id,
            icon_kind,
            pinned,
            icon_elapsed.as_millis(),
            dynamic_elapsed.as_millis(),
            pin_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(RegistrationReport {
            pinned,
            icon_kind,
            icon_degraded,
            dynamic_registered,
            ledger_recorded,
        })
    }

    /// 构建最终图标，返回 `(图标, 是否发生降级)`。
    fn build_icon(&self, request: &ShortcutRequest) -> Result<(ShortcutIcon, bool), AppError> {
        log::debug!("➡️ [{}] 阶段: {}", request.id, RegistrationStage::ResolvingIcon);
        let kind = request.image_source_kind;

        let Some(adaptive) = &request.adaptive else {
            let icon = self.resolver.resolve(&request.image_source, kind)?;
            return Ok((ShortcutIcon::from_resolved(icon), false));
        };

        let foreground = match self.resolver.resolve(&adaptive.foreground, kind) {
            Ok(foreground) => foreground,
            Err(err) => {
                log::warn!("⚠️ 前景图标解析失败，降级为主图标 - id: {} 原因: {}", request.id, err);
                let icon = self.resolver.resolve(&request.image_source, kind)?;
                return Ok((ShortcutIcon::from_resolved(icon), true));
            }
        };

        log::debug!("➡️ [{}] 阶段: {}", request.id, RegistrationStage::Composing);
        match self.compose(&foreground, adaptive, kind) {
            Ok(bitmap) => Ok((ShortcutIcon::AdaptiveBitmap(bitmap), false)),
            Err(err) => {
                log::warn!("⚠️ 自适应图标合成失败，降级为前景图标 - id: {} 原因: {}", request.id, err);
                Ok((ShortcutIcon::from_resolved(foreground), true))
            }
        }
    }

    fn compose(
        &self,
        foreground: &ResolvedIcon,
        adaptive: &AdaptiveIcon,
        kind: ImageSourceKind,
    ) -> Result<image::RgbaImage, IconError> {
        match &adaptive.background {
            None => self.composer.compose(foreground, BackgroundLayer::Transparent),
            Some(AdaptiveBackground::Color(value)) => self
                .composer
                .compose(foreground, BackgroundLayer::Color(parse_color(value))),
            Some(AdaptiveBackground::Image(source)) => {
                let background = self.resolver.resolve(source, kind).map_err(|e| {
                    IconError::Composition(format!("背景图解析失败：{}", e))
                })?;
                self.composer
                    .compose(foreground, BackgroundLayer::Image(&background))
            }
        }
    }
}
