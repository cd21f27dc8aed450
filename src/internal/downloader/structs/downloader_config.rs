use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::conflict_policy::ConflictPolicy;
use super::download_error::DownloadError;

/// 默认最小分片阈值：1MB
pub const DEFAULT_MIN_SPLIT_BURST: u64 = 1024 * 1024;

/// 默认重试次数：不重试
pub const DEFAULT_MAX_RETRIES: usize = 0;

/// 默认重试延迟（毫秒）
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// 下载器配置
///
/// 显式构造后传入 [`Downloader::new`](super::downloader::Downloader::new)，不依赖任何全局状态，
/// 因此不同配置的下载器可以同时使用。支持 serde 反序列化，缺省字段取默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloaderConfig {
    /// 文件保存目录
    pub download_path: PathBuf,
    /// 最小分片阈值（字节）；文件小于该值时整文件单段下载
    pub min_split_burst: u64,
    /// 目标文件已存在时的处理方式
    pub conflict_policy: ConflictPolicy,
    /// 单个分片失败后的最大重试次数
    pub max_retries: usize,
    /// 重试延迟（毫秒）
    pub retry_delay_ms: u64,
    /// 建立连接超时（秒），未设置则不限
    pub connect_timeout_secs: Option<u64>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            download_path: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            min_split_burst: DEFAULT_MIN_SPLIT_BURST,
            conflict_policy: ConflictPolicy::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            connect_timeout_secs: None,
        }
    }
}

impl DownloaderConfig {
    pub fn new(download_path: impl AsRef<Path>, min_split_burst: u64) -> Self {
        Self {
            download_path: download_path.as_ref().to_path_buf(),
            min_split_burst,
            ..Default::default()
        }
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// 设置分片失败最大重试次数与重试延迟
    pub fn with_retries(mut self, max_retries: usize, retry_delay_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = Some(secs);
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), DownloadError> {
        if self.download_path.as_os_str().is_empty() {
            return Err(DownloadError::InvalidConfig("download_path 为空".to_string()));
        }
        if self.min_split_burst == 0 {
            return Err(DownloadError::InvalidConfig(
                "min_split_burst 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }
}
