use tracing::instrument;

use crate::internal::downloader::structs::{
    DownloadError, DownloadOutcome, Downloader, DownloaderConfig,
};
use crate::internal::request::structs::request::Request;
use crate::internal::transport::structs::resolution::Resolution;

/// 探测远程资源：文件名、总大小、是否支持 Range 请求。
///
/// 只发送 `Range: bytes=0-0` 探测请求，不下载内容。
///
/// example:
/// ```rust,no_run
/// use range_down::{request::Request, resolve};
///
/// # async fn example() -> Result<(), range_down::downloader::DownloadError> {
/// let resolution = resolve(&Request::get("https://example.com/files/test.txt")?).await?;
/// println!("{} {} {}", resolution.name, resolution.size, resolution.range_supported);
/// # Ok(())
/// # }
/// ```
#[instrument(skip(request), fields(url = %request.url()))]
pub async fn resolve(request: &Request) -> Result<Resolution, DownloadError> {
    Downloader::new(DownloaderConfig::default())?
        .resolve(request)
        .await
}

/// 按给定配置下载一个文件到 `<download_path>/<文件名>`。
///
/// 只下载一次可以直接用本函数；需要进度、取消或复用配置时请使用 [`Downloader`]。
pub async fn download(
    config: &DownloaderConfig,
    request: Request,
) -> Result<DownloadOutcome, DownloadError> {
    Downloader::new(config.clone())?.download(request).await
}
