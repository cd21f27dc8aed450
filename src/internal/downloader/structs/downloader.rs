use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::internal::request::structs::request::Request;
use crate::internal::transport::http::HttpTransport;
use crate::internal::transport::structs::resolution::Resolution;
use crate::internal::transport::traits::transport::Transport;

use super::download_error::DownloadError;
use super::download_outcome::DownloadOutcome;
use super::download_task::DownloadTask;
use super::downloader_config::DownloaderConfig;

/// 下载器：持有配置与传输层，可同时发起多个下载。
///
/// 克隆开销很小（内部为 `Arc`）。
///
/// ```rust,no_run
/// # use range_down::downloader::{Downloader, DownloaderConfig};
/// # use range_down::request::Request;
/// # async fn example() -> Result<(), range_down::downloader::DownloadError> {
/// let downloader = Downloader::new(DownloaderConfig::new("/tmp/downloads", 4 * 1024 * 1024))?;
/// let outcome = downloader
///     .download(Request::get("https://example.com/large.iso")?)
///     .await?;
/// println!("已保存到 {}", outcome.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: Arc<DownloaderConfig>,
    transports: Vec<Arc<dyn Transport>>,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schemes: Vec<&str> = self
            .transports
            .iter()
            .flat_map(|t| t.schemes().iter().copied())
            .collect();
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .field("schemes", &schemes)
            .finish()
    }
}

impl Downloader {
    /// 校验配置并创建下载器，默认注册 HTTP/HTTPS 传输层。
    pub fn new(config: DownloaderConfig) -> Result<Self, DownloadError> {
        config.validate()?;
        let http = HttpTransport::new().with_connect_timeout(config.connect_timeout());
        Ok(Self {
            config: Arc::new(config),
            transports: vec![Arc::new(http)],
        })
    }

    /// 注册传输层；与已有传输层协议重叠时，后注册的优先。
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transports.insert(0, Arc::new(transport));
        self
    }

    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// 按 URL 协议选择传输层
    pub(crate) fn transport_for(&self, url: &Url) -> Result<Arc<dyn Transport>, DownloadError> {
        let scheme = url.scheme();
        self.transports
            .iter()
            .find(|t| t.schemes().contains(&scheme))
            .cloned()
            .ok_or_else(|| DownloadError::UnsupportedScheme(scheme.to_string()))
    }

    /// 只探测，不下载。
    pub async fn resolve(&self, request: &Request) -> Result<Resolution, DownloadError> {
        self.transport_for(request.url())?.resolve(request).await
    }

    /// 创建下载任务；可在 [`DownloadTask::send`] 之前取得进度监听与取消令牌。
    pub fn task(&self, request: Request) -> DownloadTask {
        DownloadTask::new(self.clone(), request)
    }

    pub async fn download(&self, request: Request) -> Result<DownloadOutcome, DownloadError> {
        self.task(request).send().await
    }

    /// 令牌被取消时停止全部分片，返回 [`DownloadError::Cancelled`]。
    pub async fn download_with_cancel(
        &self,
        request: Request,
        cancel: CancellationToken,
    ) -> Result<DownloadOutcome, DownloadError> {
        self.task(request).with_cancel(cancel).send().await
    }
}
