pub mod conflict_policy;
pub mod download_error;
pub mod download_outcome;
pub mod download_progress;
pub mod download_task;
pub mod downloader;
pub mod downloader_config;

// 重导出公共类型
pub use conflict_policy::ConflictPolicy;
pub use download_error::DownloadError;
pub use download_outcome::DownloadOutcome;
pub use download_progress::DownloadProgress;
pub use download_task::DownloadTask;
pub use downloader::Downloader;
pub use downloader_config::{
    DEFAULT_MAX_RETRIES, DEFAULT_MIN_SPLIT_BURST, DEFAULT_RETRY_DELAY_MS, DownloaderConfig,
};
