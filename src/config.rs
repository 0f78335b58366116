//! # 配置模块
//!
//! ## 设计思路
//!
//! 将下载、解码、图标尺寸与账本键名等可调参数集中到 `ShortcutConfig`，
//! 保证运行时行为可观测、可调整、可测试。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的默认值。
//! - 通过 serde 以 JSON 持久化，字段缺失时逐项回退到默认值。
//! - 配置文件缺失或损坏时整体回退到默认配置（记录日志，不报错）。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 账本在键值存储中的默认键名。
pub const DEFAULT_LEDGER_KEY: &str = "pinned_shortcuts";

/// 快捷方式服务配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShortcutConfig {
    /// 下载/读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 网络下载超时时间（秒）。
    pub download_timeout: u64,
    /// 建立连接超时时间（秒）。
    pub connect_timeout: u64,
    /// 最大重定向次数。
    pub max_redirects: usize,
    /// 是否允许访问内网或本地地址（默认关闭，防 SSRF）。
    pub allow_private_network: bool,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 普通图标的单边最大尺寸，超出时等比降采样。
    pub max_icon_dimension: u32,
    /// 账本在键值存储中的键名。
    pub ledger_key: String,
    /// 网络图片的暂存目录；为空时使用系统临时目录。
    pub download_dir: Option<String>,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            download_timeout: 30,
            connect_timeout: 8,
            max_redirects: 5,
            allow_private_network: false,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            max_icon_dimension: 1024,
            ledger_key: DEFAULT_LEDGER_KEY.to_string(),
            download_dir: None,
        }
    }
}

impl ShortcutConfig {
    /// 从 JSON 文件加载配置，文件缺失或解析失败时回退到默认配置。
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<ShortcutConfig>(&content) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("配置文件解析失败，使用默认配置: {} ({})", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("读取配置文件失败，使用默认配置: {} ({})", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Storage(format!("序列化配置失败: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
