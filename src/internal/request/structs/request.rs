use std::collections::BTreeMap;

use bytes::Bytes;
use reqwest::Method;
use url::Url;

use crate::internal::downloader::structs::download_error::DownloadError;

use super::checksum::Checksum;

/// 下载请求
///
/// 构建后只读；下载时以 `Arc<Request>` 的形式在所有分片任务间共享。
///
/// - 方法名大小写不敏感，统一转为大写
/// - 请求头键名大小写不敏感且唯一，后设置的值覆盖先设置的值
/// - `file_name` / `checksum` 只是提示：前者决定本地文件名，后者用于下载完成后的校验
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: BTreeMap<String, String>,
    body: Option<Bytes>,
    file_name: Option<String>,
    checksum: Option<Checksum>,
}

impl Request {
    /// 创建请求；`url` 必须是绝对地址。
    pub fn new(method: &str, url: &str) -> Result<Self, DownloadError> {
        let upper = method.trim().to_ascii_uppercase();
        if upper.is_empty() {
            return Err(DownloadError::InvalidRequest("请求方法为空".to_string()));
        }
        let method = Method::from_bytes(upper.as_bytes())
            .map_err(|_| DownloadError::InvalidRequest(format!("非法请求方法: {method}")))?;
        let url = Url::parse(url)
            .map_err(|e| DownloadError::InvalidRequest(format!("非法 URL `{url}`: {e}")))?;

        Ok(Self {
            method,
            url,
            headers: BTreeMap::new(),
            body: None,
            file_name: None,
            checksum: None,
        })
    }

    /// 便捷方法：GET 请求
    pub fn get(url: &str) -> Result<Self, DownloadError> {
        Self::new("GET", url)
    }

    /// 设置请求头
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers
            .insert(key.trim().to_ascii_lowercase(), value.to_string());
        self
    }

    /// 设置请求体；探测请求不会携带请求体。
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// 期望的本地文件名，优先于服务器解析出的文件名。
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// 期望的文件校验值，下载完成后校验。
    pub fn checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// 请求头（键名已转为小写）
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn file_name_hint(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn checksum_hint(&self) -> Option<&Checksum> {
        self.checksum.as_ref()
    }
}
