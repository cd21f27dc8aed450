//! HTTP 传输层：`Range: bytes=0-0` 探测 + 按分片发起 Range 请求。

mod build_request;
pub mod headers;
mod http_transport;

pub use http_transport::HttpTransport;
