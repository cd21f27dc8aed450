//! 单次下载任务
//!
//! 流程：按 URL 协议选择传输层 → 探测 → 按冲突策略创建并预分配文件 →
//! 支持 Range 且大小已知时分片并发下载，否则整文件单段下载 → 落盘 → 可选校验。
//!
//! ## 失败处理
//!
//! - 探测失败、创建文件失败：直接返回，不会启动任何分片
//! - 任一分片失败：取消其余分片，等待全部结束后返回汇总错误
//! - 文件创建之后的任何失败（包括取消）都会删除不完整的文件；不支持跨进程续传
//!
//! ## 内部实现说明
//!
//! - `chunk_worker` 子模块：单段下载与重试
//! - `chunked_download` 子模块：分片任务组与结果汇总
//! - `destination` 子模块：冲突策略与文件创建
//! - `verify` 子模块：SHA-256 校验

mod chunk_worker;
mod chunked_download;
mod destination;
mod verify;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::internal::file_sink::FileSink;
use crate::internal::request::structs::request::Request;
use crate::internal::splitter::calculate_burst::split_chunks;
use crate::internal::transport::http::headers::sanitize_file_name;
use crate::internal::transport::structs::resolution::Resolution;

use super::download_error::DownloadError;
use super::download_outcome::DownloadOutcome;
use super::download_progress::{DownloadProgress, ProgressReporter};
use super::downloader::Downloader;
use chunk_worker::{ChunkWorkerContext, FetchTarget, fetch_with_retry};
use chunked_download::run_chunked_download;
use destination::open_destination;
use verify::verify_checksum;

/// 单次下载任务，由 [`Downloader::task`] 创建，调用 [`DownloadTask::send`] 执行。
pub struct DownloadTask {
    downloader: Downloader,
    request: Arc<Request>,
    cancel: CancellationToken,
    progress: Arc<watch::Sender<DownloadProgress>>,
}

impl DownloadTask {
    pub(crate) fn new(downloader: Downloader, request: Request) -> Self {
        let (progress, _) = watch::channel(DownloadProgress::default());
        Self {
            downloader,
            request: Arc::new(request),
            cancel: CancellationToken::new(),
            progress: Arc::new(progress),
        }
    }

    /// 使用外部取消令牌
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// 取消令牌；`cancel()` 后正在进行的下载返回 [`DownloadError::Cancelled`]。
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 下载进度；返回的接收端 `changed().await` 即可监听。
    pub fn progress(&self) -> watch::Receiver<DownloadProgress> {
        self.progress.subscribe()
    }

    /// 执行下载
    #[instrument(skip(self), fields(url = %self.request.url()))]
    pub async fn send(self) -> Result<DownloadOutcome, DownloadError> {
        let transport = self.downloader.transport_for(self.request.url())?;
        // 分片失败时只取消本次下载，不影响调用方的令牌
        let cancel = self.cancel.child_token();

        let resolution = tokio::select! {
            _ = cancel.cancelled() => return Err(DownloadError::Cancelled),
            resolution = transport.resolve(&self.request) => resolution?,
        };
        info!(
            name = %resolution.name,
            size = resolution.size,
            range_supported = resolution.range_supported,
            size_known = resolution.size_known,
            "探测完成"
        );

        let config = self.downloader.config();
        let name = self
            .request
            .file_name_hint()
            .and_then(sanitize_file_name)
            .unwrap_or_else(|| resolution.name.clone());

        let sink = Arc::new(
            open_destination(
                &config.download_path,
                &name,
                resolution.size,
                config.conflict_policy,
            )
            .await?,
        );
        let path = sink.path().to_path_buf();
        debug!(path = %path.display(), size = resolution.size, "文件已预分配");

        let total = resolution.size_known.then_some(resolution.size);
        let ctx = Arc::new(ChunkWorkerContext {
            transport,
            request: Arc::clone(&self.request),
            sink: Arc::clone(&sink),
            progress: Arc::new(ProgressReporter::new(Arc::clone(&self.progress), total)),
            cancel,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        });

        let result = self.fetch_all(ctx, &resolution, sink).await;
        match result {
            Ok(outcome) => {
                info!(
                    path = %outcome.path.display(),
                    bytes = outcome.bytes_written,
                    chunk_count = outcome.chunk_count,
                    "下载完成"
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "下载失败，删除不完整的文件");
                remove_partial(path).await;
                Err(e)
            }
        }
    }

    async fn fetch_all(
        &self,
        ctx: Arc<ChunkWorkerContext>,
        resolution: &Resolution,
        sink: Arc<FileSink>,
    ) -> Result<DownloadOutcome, DownloadError> {
        let range_used = resolution.range_supported && resolution.size_known;
        let cancel = ctx.cancel.clone();

        let (bytes_written, chunk_count) = if range_used {
            let chunks = split_chunks(resolution.size, self.downloader.config().min_split_burst);
            let chunk_count = chunks.len();
            info!(chunk_count, "开始分片下载");
            (run_chunked_download(ctx, chunks).await?, chunk_count)
        } else {
            info!("不支持 Range 或大小未知，整文件下载");
            let expected = resolution.size_known.then_some(resolution.size);
            (fetch_with_retry(&ctx, FetchTarget::whole(expected)).await?, 1)
        };

        // 落盘与校验期间同样响应取消
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DownloadError::Cancelled),
            finished = self.finish(&sink) => finished?,
        }

        Ok(DownloadOutcome {
            path: sink.path().to_path_buf(),
            bytes_written,
            chunk_count,
            range_used,
        })
    }

    /// 落盘并按需校验
    async fn finish(&self, sink: &FileSink) -> Result<(), DownloadError> {
        sink.flush().await?;
        if let Some(checksum) = self.request.checksum_hint() {
            verify_checksum(sink.path(), checksum).await?;
            debug!("文件校验通过");
        }
        Ok(())
    }
}

async fn remove_partial(path: PathBuf) {
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!(path = %path.display(), error = %e, "删除不完整的文件失败");
    }
}
