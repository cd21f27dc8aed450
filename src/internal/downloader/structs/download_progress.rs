use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

/// 下载进度：已写入字节数与总大小。
///
/// 调用方通过 [`DownloadTask::progress`](super::download_task::DownloadTask::progress)
/// 取得 `watch::Receiver` 后 `changed().await` 监听；进度比例可用 [`DownloadProgress::pct`] 获取。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadProgress {
    /// 已写入本地文件的字节数
    pub bytes_done: u64,
    /// 文件总大小（字节），未知时为 `None`
    pub total: Option<u64>,
}

impl DownloadProgress {
    /// 进度百分比（0～100）；总大小为 0 或未知时返回 `f64::NAN`。
    pub fn pct(&self) -> f64 {
        self.total
            .filter(|&t| t > 0)
            .map(|t| (self.bytes_done as f64 / t as f64) * 100.0)
            .unwrap_or(f64::NAN)
    }
}

/// 多个分片任务共享的进度计数器。
#[derive(Debug)]
pub(crate) struct ProgressReporter {
    bytes_done: AtomicU64,
    total: Option<u64>,
    sender: Arc<watch::Sender<DownloadProgress>>,
}

impl ProgressReporter {
    pub(crate) fn new(sender: Arc<watch::Sender<DownloadProgress>>, total: Option<u64>) -> Self {
        sender.send_replace(DownloadProgress {
            bytes_done: 0,
            total,
        });
        Self {
            bytes_done: AtomicU64::new(0),
            total,
            sender,
        }
    }

    pub(crate) fn add(&self, len: u64) {
        let current = self.bytes_done.fetch_add(len, Ordering::Relaxed) + len;
        self.publish(current);
    }

    /// 分片重试前回退该分片已计入的字节。
    pub(crate) fn rewind(&self, len: u64) {
        let current = self.bytes_done.fetch_sub(len, Ordering::Relaxed) - len;
        self.publish(current);
    }

    fn publish(&self, bytes_done: u64) {
        self.sender.send_replace(DownloadProgress {
            bytes_done,
            total: self.total,
        });
    }
}
