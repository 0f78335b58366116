//! # 快捷方式模块（shortcut）
//!
//! - `request`：创建请求与自适应图标参数
//! - `descriptor`：交给平台的描述对象与最终图标
//! - `registrar`：解析 → 合成 → 构建 → 双重注册 的编排器

mod descriptor;
mod registrar;
mod request;

pub use descriptor::{ShortcutDescriptor, ShortcutIcon};
pub use registrar::{RegistrationReport, RegistrationStage, ShortcutRegistrar};
pub use request::{AdaptiveBackground, AdaptiveIcon, ShortcutRequest};
