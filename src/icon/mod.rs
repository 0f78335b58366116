//! # 图标模块（icon）
//!
//! ## 设计思路
//!
//! 将“来源识别 → 读取/下载 → 解码降采样 → 自适应合成”按职责拆分为多个子模块：
//!
//! - `source`：来源类型、可绘制对象与解析结果的数据模型
//! - `assets`：素材读取器与资源表（可替换的宿主协作方）
//! - `resolver`：按来源类型把字符串解析成 `ResolvedIcon`
//! - `pipeline`：解码、像素限制、降采样
//! - `fetch`：网络图标下载与暂存（SSRF 防护 + 体积限制）
//! - `color`：颜色字符串解析
//! - `composer`：自适应图标（背景 + 居中前景）合成
//! - `error`：图标链路专用错误
//!
//! ## 实现思路
//!
//! 解析与合成都是同步阻塞代码，由注册编排器放进 `spawn_blocking`；
//! 只有下载是异步的，在阻塞阶段开始前完成。
//!
//! ```text
//! ShortcutRegistrar
//!    ├─ fetch.rs（Network 来源先下载到本地）
//!    ↓
//! resolver.rs（Asset / Resource / File）
//!    └─ pipeline.rs（解码 + 像素限制 + 降采样）
//!    ↓
//! composer.rs（自适应图标合成，可选）
//! ```

mod assets;
mod color;
mod composer;
mod error;
mod fetch;
mod pipeline;
mod resolver;
mod source;

pub use assets::{
    AssetReader, DirAssetReader, DirResourceTable, MemoryResourceTable, NoopAssetReader,
    NoopResourceTable, ResourceTable,
};
pub use color::{TRANSPARENT, parse_color, try_parse_color};
pub use composer::{ADAPTIVE_ICON_SIZE, AdaptiveIconComposer, BackgroundLayer};
pub use error::IconError;
pub use fetch::{HttpImageFetcher, NoopImageFetcher, RemoteImageFetcher};
pub use resolver::IconResolver;
pub use source::{Drawable, ImageSourceKind, ResolvedIcon, ResourceRef};
