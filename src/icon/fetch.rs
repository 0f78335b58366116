//! # 网络图标下载模块
//!
//! ## 设计思路
//!
//! 网络来源的图标先被下载并暂存为本地文件，编排器再把返回路径当作 `File` 来源解析。
//! 下载器是一个可替换的协作方（`RemoteImageFetcher`），默认实现基于 `reqwest`。
//!
//! ## 实现思路
//!
//! - 协议 + 主机安全校验（默认阻止本地/内网地址，防 SSRF）。
//! - 手动跟随重定向，每一跳都重新做安全校验。
//! - Content-Type + Content-Length + 流式读取体积上限。
//! - 文件签名（magic bytes）校验，拒绝伪装成图片的内容。
//! - 以快捷方式 id 命名暂存文件，重复创建会覆盖旧文件。

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use super::IconError;
use crate::config::ShortcutConfig;
use crate::error::AppError;
use crate::storage::{resolve_download_dir, sanitize_file_stem};

const BUFFER_INITIAL_CAPACITY: usize = 16 * 1024;

/// 远程图标下载协作方：给定 URL 与快捷方式 id，返回本地暂存文件路径。
#[async_trait]
pub trait RemoteImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, id: &str) -> Result<PathBuf, IconError>;
}

/// 未配置网络能力时使用的下载器，所有请求直接失败。
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopImageFetcher;

#[async_trait]
impl RemoteImageFetcher for NoopImageFetcher {
    async fn fetch(&self, url: &str, _id: &str) -> Result<PathBuf, IconError> {
        Err(IconError::Network(format!(
            "未配置网络下载器：{}",
            HttpImageFetcher::redact_url_for_log(url)
        )))
    }
}

/// 基于 `reqwest` 的下载器。
pub struct HttpImageFetcher {
    config: ShortcutConfig,
    download_dir: PathBuf,
}

impl HttpImageFetcher {
    /// 创建下载器并准备暂存目录。
    pub fn new(config: ShortcutConfig) -> Result<Self, AppError> {
        let download_dir = resolve_download_dir(config.download_dir.as_deref())?;
        Ok(Self {
            config,
            download_dir,
        })
    }

    pub fn download_dir(&self) -> &std::path::Path {
        &self.download_dir
    }

    /// 执行带校验的网络下载（不含首个 URL 的安全校验）。
    pub(crate) async fn download_with_validation(&self, url: &str) -> Result<Vec<u8>, IconError> {
        let config = &self.config;
        let client = Self::build_http_client(config)?;
        let mut current_url = reqwest::Url::parse(url)
            .map_err(|e| IconError::InvalidFormat(format!("URL 格式错误：{}", e)))?;

        for redirect_count in 0..=config.max_redirects {
            log::debug!("📡 发送 HTTP 请求: {}", Self::redact_url_for_log(current_url.as_str()));
            let response = client
                .get(current_url.clone())
                .header(reqwest::header::ACCEPT, "image/*,*/*;q=0.8")
                .send()
                .await
                .map_err(|e| self.map_reqwest_error(e, current_url.as_str()))?;

            if response.status().is_redirection() {
                if redirect_count >= config.max_redirects {
                    return Err(IconError::Network(format!(
                        "重定向次数超过限制（{}）",
                        config.max_redirects
                    )));
                }

                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .ok_or_else(|| IconError::Network("重定向响应缺少 Location 头".to_string()))?;
                let location_str = location
                    .to_str()
                    .map_err(|e| IconError::InvalidFormat(format!("重定向地址无效：{}", e)))?;
                let next_url = current_url
                    .join(location_str)
                    .map_err(|e| IconError::InvalidFormat(format!("重定向 URL 解析失败：{}", e)))?;

                Self::validate_url_safety(next_url.as_str(), config)?;

                log::debug!("↪️ 跳转到: {}", Self::redact_url_for_log(next_url.as_str()));
                current_url = next_url;
                continue;
            }

            if !response.status().is_success() {
                return Err(IconError::Network(format!(
                    "HTTP {}: {}",
                    response.status().as_u16(),
                    Self::status_message(response.status().as_u16())
                )));
            }

            if let Some(ct) = response.headers().get(reqwest::header::CONTENT_TYPE) {
                if let Ok(ct_str) = ct.to_str() {
                    if !Self::is_image_content_type(ct_str) {
                        return Err(IconError::InvalidFormat(format!("不是图片类型：{}", ct_str)));
                    }
                }
            }

            let total_len = response
                .headers()
                .get(reqwest::header::CONTENT_LENGTH)
                .and_then(|cl| cl.to_str().ok())
                .and_then(|cl| cl.parse::<u64>().ok());

            if let Some(size) = total_len {
                if size > config.max_file_size {
                    return Err(IconError::ResourceLimit(format!(
                        "文件过大：{:.2} MB（限制：{:.2} MB）",
                        size as f64 / 1024.0 / 1024.0,
                        config.max_file_size as f64 / 1024.0 / 1024.0
                    )));
                }
            }

            let initial_capacity = total_len
                .map(|len| len.min(config.max_file_size) as usize)
                .filter(|len| *len > 0)
                .unwrap_or(BUFFER_INITIAL_CAPACITY);
            let mut buffer = Vec::with_capacity(initial_capacity);
            let mut response = response;

            while let Some(chunk) = response
                .chunk()
                .await
                .map_err(|e| IconError::Network(format!("下载失败：{}", e)))?
            {
                if (buffer.len() + chunk.len()) as u64 > config.max_file_size {
                    return Err(IconError::ResourceLimit("下载后文件超过大小限制".to_string()));
                }
                buffer.extend_from_slice(&chunk);
            }

            Self::validate_image_signature(&buffer)?;
            log::debug!("✅ 下载完成 - {} bytes", buffer.len());
            return Ok(buffer);
        }

        Err(IconError::Network("下载流程异常结束".to_string()))
    }

    fn build_http_client(config: &ShortcutConfig) -> Result<reqwest::Client, IconError> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(config.download_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| IconError::Network(format!("无法创建 HTTP 客户端：{}", e)))
    }

    /// 校验 URL 安全性。
    ///
    /// 默认阻止本地/内网目标，防止 SSRF 风险。
    fn validate_url_safety(url: &str, config: &ShortcutConfig) -> Result<(), IconError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| IconError::InvalidFormat(format!("URL 格式错误：{}", e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(IconError::InvalidFormat("仅支持 HTTP/HTTPS".to_string()));
        }

        if config.allow_private_network {
            return Ok(());
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| IconError::InvalidFormat("URL 缺少主机地址".to_string()))?;

        if Self::is_local_hostname(host) {
            return Err(IconError::InvalidFormat(format!("禁止访问本地网络地址：{}", host)));
        }

        let bare_host = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = bare_host.parse::<IpAddr>() {
            if Self::is_private_or_local_ip(ip) {
                return Err(IconError::InvalidFormat(format!("禁止访问内网 IP：{}", ip)));
            }
        }

        Ok(())
    }

    fn is_local_hostname(host: &str) -> bool {
        host.eq_ignore_ascii_case("localhost")
            || host.eq_ignore_ascii_case("localhost.")
            || host.ends_with(".local")
    }

    /// 判断 IP 是否属于本地/内网/链路本地等受限范围。
    fn is_private_or_local_ip(ip: IpAddr) -> bool {
        match ip {
            IpAddr::V4(v4) => {
                if v4.is_private()
                    || v4.is_loopback()
                    || v4.is_link_local()
                    || v4.is_broadcast()
                    || v4.is_unspecified()
                    || v4.is_multicast()
                {
                    return true;
                }

                let octets = v4.octets();
                octets[0] == 0 || (octets[0] == 100 && (octets[1] & 0b1100_0000) == 0b0100_0000)
            }
            IpAddr::V6(v6) => {
                v6.is_loopback()
                    || v6.is_unspecified()
                    || v6.is_unique_local()
                    || v6.is_unicast_link_local()
                    || v6.is_multicast()
            }
        }
    }

    fn is_image_content_type(content_type: &str) -> bool {
        content_type
            .split(';')
            .next()
            .map(|base| base.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false)
    }

    pub(crate) fn redact_url_for_log(url: &str) -> String {
        let Ok(parsed) = reqwest::Url::parse(url) else {
            return "<invalid-url>".to_string();
        };

        let host = parsed.host_str().unwrap_or("<unknown-host>");
        let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();
        format!("{}://{}{}{}", parsed.scheme(), host, port, parsed.path())
    }

    fn map_reqwest_error(&self, e: reqwest::Error, url: &str) -> IconError {
        let err_msg = e.to_string().replace(url, &Self::redact_url_for_log(url));

        if e.is_timeout() {
            IconError::Timeout(format!("下载超时（{}秒）", self.config.download_timeout))
        } else if e.is_connect() {
            IconError::Network(format!("无法连接：{}", err_msg))
        } else {
            IconError::Network(format!("请求失败：{}", err_msg))
        }
    }

    fn status_message(code: u16) -> &'static str {
        match code {
            404 => "未找到",
            403 => "访问被拒绝",
            500..=599 => "服务器错误",
            _ => "请求失败",
        }
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), IconError> {
        if bytes.is_empty() {
            return Err(IconError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| IconError::InvalidFormat("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(IconError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl RemoteImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str, id: &str) -> Result<PathBuf, IconError> {
        log::info!("🌐 开始下载快捷方式图标 - id: {} URL: {}", id, Self::redact_url_for_log(url));

        Self::validate_url_safety(url, &self.config)?;
        let bytes = self.download_with_validation(url).await?;

        let extension = infer::get(&bytes).map(|kind| kind.extension()).unwrap_or("img");
        let path = self
            .download_dir
            .join(format!("shortcut_{}.{}", sanitize_file_stem(id), extension));

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| IconError::FileSystem(format!("写入暂存文件失败：{}", e)))?;

        log::info!("✅ 图标已暂存 - {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
