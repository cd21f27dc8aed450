use std::path::PathBuf;

/// 单次下载成功后的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// 本地文件路径
    pub path: PathBuf,
    /// 实际写入的字节数
    pub bytes_written: u64,
    /// 分片数量；整文件下载时为 1
    pub chunk_count: usize,
    /// 是否使用了 Range 分片下载
    pub range_used: bool,
}
