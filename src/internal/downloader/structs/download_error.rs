//! 下载相关错误类型。

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("请求参数错误: {0}")]
    InvalidRequest(String),

    #[error("不支持的 URL 协议: {0}")]
    UnsupportedScheme(String),

    #[error("配置错误: {0}")]
    InvalidConfig(String),

    #[error("HTTP 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("读取响应体失败: {0}")]
    BodyRead(std::io::Error),

    #[error("响应状态异常: {status}")]
    UnexpectedStatus { status: u16 },

    #[error("服务器忽略了 Range 请求")]
    RangeIgnored,

    #[error("响应头 {header} 格式错误: {value}")]
    InvalidHeader { header: &'static str, value: String },

    #[error("创建文件失败: {0}")]
    CreateFile(std::io::Error),

    #[error("文件已存在: {}", .0.display())]
    FileExists(PathBuf),

    #[error("预分配文件空间失败: {0}")]
    PreallocateFile(std::io::Error),

    #[error("写入文件失败: {0}")]
    WriteFile(std::io::Error),

    #[error("文件定位失败: {0}")]
    SeekFile(std::io::Error),

    #[error("刷新文件失败: {0}")]
    FlushFile(std::io::Error),

    #[error("读取文件失败: {0}")]
    ReadFile(std::io::Error),

    #[error("分片数据长度不符: 期望 {expected} 字节，实际 {received} 字节")]
    ShortChunk { expected: u64, received: u64 },

    #[error("分片 {chunk_index} 下载失败: {source}")]
    ChunkFailed {
        chunk_index: usize,
        #[source]
        source: Box<DownloadError>,
    },

    #[error("多个分片下载失败: {0:?}")]
    MultipleChunksFailed(Vec<DownloadError>),

    #[error("分片任务失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("文件校验失败: 期望 {expected}，实际 {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("下载被取消")]
    Cancelled,
}
