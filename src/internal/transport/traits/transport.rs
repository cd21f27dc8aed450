//! 传输层 trait：探测与按区间读取，供下载器按 URL 协议选择具体实现。

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::internal::downloader::structs::download_error::DownloadError;
use crate::internal::request::structs::request::Request;
use crate::internal::splitter::chunk::Chunk;
use crate::internal::transport::structs::resolution::Resolution;

/// 响应体读取端
pub type BodyReader = Box<dyn AsyncRead + Send + Unpin>;

/// 传输层：HTTP 之外的协议（如点对点传输）实现本 trait 后，通过
/// [`Downloader::with_transport`](crate::downloader::Downloader::with_transport) 注册即可复用整个分片下载流程。
#[async_trait]
pub trait Transport: Send + Sync {
    /// 本传输层负责的 URL 协议（小写），如 `["http", "https"]`
    fn schemes(&self) -> &[&'static str];

    /// 探测远程资源：文件名、总大小、是否支持区间读取。
    async fn resolve(&self, request: &Request) -> Result<Resolution, DownloadError>;

    /// 打开一段区间的读取流；`chunk` 为 `None` 时读取整个资源。
    ///
    /// 每次调用使用独立连接。调用方保证不会传入空分片。
    async fn open_range(
        &self,
        request: &Request,
        chunk: Option<&Chunk>,
    ) -> Result<BodyReader, DownloadError>;
}
