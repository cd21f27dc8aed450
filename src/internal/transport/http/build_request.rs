use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RANGE};
use reqwest::{Client, RequestBuilder};

use crate::internal::downloader::structs::download_error::DownloadError;
use crate::internal::request::structs::request::Request;

/// 由下载请求构建 HTTP 请求时的参数（形参超过 3 个，用 struct 承载）。
pub(super) struct BuildHttpRequestParams<'a> {
    pub client: &'a Client,
    pub request: &'a Request,
    /// 覆盖调用方设置的 Range 头
    pub range: Option<&'a str>,
    pub with_body: bool,
}

/// 按请求的方法、URL、请求头构建 HTTP 请求。
pub(super) fn build_http_request(
    params: BuildHttpRequestParams<'_>,
) -> Result<RequestBuilder, DownloadError> {
    let mut headers = HeaderMap::new();
    for (key, value) in params.request.headers() {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| DownloadError::InvalidRequest(format!("非法请求头名: {key}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| DownloadError::InvalidRequest(format!("请求头 {key} 的值非法")))?;
        headers.insert(name, value);
    }

    if let Some(range) = params.range {
        let value = HeaderValue::from_str(range)
            .map_err(|_| DownloadError::InvalidRequest(format!("非法 Range: {range}")))?;
        headers.insert(RANGE, value);
    }

    let mut builder = params
        .client
        .request(params.request.method().clone(), params.request.url().clone())
        .headers(headers);

    if params.with_body {
        if let Some(body) = params.request.body_bytes() {
            builder = builder.body(body.clone());
        }
    }

    Ok(builder)
}
