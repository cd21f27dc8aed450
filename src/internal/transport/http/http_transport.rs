use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_RANGE, HeaderMap};
use reqwest::{Client, StatusCode};
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::internal::downloader::structs::download_error::DownloadError;
use crate::internal::request::structs::request::Request;
use crate::internal::splitter::chunk::Chunk;
use crate::internal::transport::structs::resolution::Resolution;
use crate::internal::transport::traits::transport::{BodyReader, Transport};

use super::build_request::{BuildHttpRequestParams, build_http_request};
use super::headers::{parse_content_length, parse_content_range_total, resolve_file_name};

/// 探测时只请求第一个字节
const PROBE_RANGE: &str = "bytes=0-0";

/// HTTP/HTTPS 传输层
///
/// 每次探测、每个分片都新建一个 [`Client`]，分片之间不共享连接池，各自独占一条连接。
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    connect_timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    fn build_client(&self) -> Result<Client, DownloadError> {
        let mut builder = Client::builder().http1_only().cookie_store(true);
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[async_trait]
impl Transport for HttpTransport {
    fn schemes(&self) -> &[&'static str] {
        &["http", "https"]
    }

    async fn resolve(&self, request: &Request) -> Result<Resolution, DownloadError> {
        let client = self.build_client()?;
        let resp = build_http_request(BuildHttpRequestParams {
            client: &client,
            request,
            range: Some(PROBE_RANGE),
            with_body: false,
        })?
        .send()
        .await?;

        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::PARTIAL_CONTENT {
            return Err(DownloadError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let headers = resp.headers();
        let name = resolve_file_name(header_str(headers, CONTENT_DISPOSITION), request.url());
        let range_supported = status == StatusCode::PARTIAL_CONTENT;
        let size = if range_supported {
            parse_content_range_total(header_str(headers, CONTENT_RANGE))?
        } else {
            parse_content_length(header_str(headers, CONTENT_LENGTH))?
        };

        // 只读响应头，响应体随连接一起丢弃
        drop(resp);

        debug!(
            name = %name,
            size = ?size,
            range_supported,
            "探测完成"
        );

        Ok(Resolution {
            name,
            size: size.unwrap_or(0),
            range_supported,
            size_known: size.is_some(),
        })
    }

    async fn open_range(
        &self,
        request: &Request,
        chunk: Option<&Chunk>,
    ) -> Result<BodyReader, DownloadError> {
        let range = chunk.and_then(Chunk::range_header);
        let client = self.build_client()?;
        let resp = build_http_request(BuildHttpRequestParams {
            client: &client,
            request,
            range: range.as_deref(),
            with_body: true,
        })?
        .send()
        .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DownloadError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        // 200 表示服务器返回了整个文件，写到分片偏移处会覆盖相邻分片
        if range.is_some() && status != StatusCode::PARTIAL_CONTENT {
            return Err(DownloadError::RangeIgnored);
        }

        let stream = Box::pin(resp.bytes_stream().map_err(std::io::Error::other));
        Ok(Box::new(StreamReader::new(stream)))
    }
}
