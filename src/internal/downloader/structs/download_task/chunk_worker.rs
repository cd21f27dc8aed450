//! 单段下载：打开区间读取流，经固定大小缓冲写入文件对应偏移。

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::internal::downloader::structs::download_error::DownloadError;
use crate::internal::downloader::structs::download_progress::ProgressReporter;
use crate::internal::file_sink::FileSink;
use crate::internal::request::structs::request::Request;
use crate::internal::splitter::chunk::Chunk;
use crate::internal::transport::traits::transport::Transport;

/// 读取缓冲大小：8KB
pub(crate) const READ_BUFFER_SIZE: usize = 8 * 1024;

/// 所有分片任务共享的上下文（形参超过 3 个，用 struct 承载）。
pub(crate) struct ChunkWorkerContext {
    pub transport: Arc<dyn Transport>,
    pub request: Arc<Request>,
    pub sink: Arc<FileSink>,
    pub progress: Arc<ProgressReporter>,
    pub cancel: CancellationToken,
    pub max_retries: usize,
    pub retry_delay: Duration,
}

/// 一段下载任务：`chunk` 为 `None` 表示整文件下载。
#[derive(Debug, Clone, Copy)]
pub(crate) struct FetchTarget {
    pub chunk: Option<Chunk>,
    /// 期望读到的字节数；未知时为 `None`，不校验长度
    pub expected_len: Option<u64>,
}

impl FetchTarget {
    pub(crate) fn chunk(chunk: Chunk) -> Self {
        Self {
            chunk: Some(chunk),
            expected_len: Some(chunk.len),
        }
    }

    pub(crate) fn whole(expected_len: Option<u64>) -> Self {
        Self {
            chunk: None,
            expected_len,
        }
    }

    fn start(&self) -> u64 {
        self.chunk.map(|c| c.start).unwrap_or(0)
    }

    fn index(&self) -> usize {
        self.chunk.map(|c| c.index).unwrap_or(0)
    }
}

/// 下载一段，失败时按配置重试；返回写入的字节数。
///
/// 取消不重试；重试会从该段起点重新写入整段。
pub(crate) async fn fetch_with_retry(
    ctx: &ChunkWorkerContext,
    target: FetchTarget,
) -> Result<u64, DownloadError> {
    let mut attempt = 0usize;
    loop {
        attempt += 1;
        let mut written = 0u64;

        match fetch_range(ctx, target, &mut written).await {
            Ok(()) => return Ok(written),
            Err(DownloadError::Cancelled) => return Err(DownloadError::Cancelled),
            Err(e) if attempt > ctx.max_retries => return Err(e),
            Err(e) => {
                warn!(
                    chunk_index = target.index(),
                    attempt,
                    error = %e,
                    "分片下载失败，稍后重试"
                );
                ctx.progress.rewind(written);
                tokio::select! {
                    _ = ctx.cancel.cancelled() => return Err(DownloadError::Cancelled),
                    _ = tokio::time::sleep(ctx.retry_delay) => {}
                }
            }
        }
    }
}

/// 单次尝试：发起区间请求，流式写入；`written` 记录本次已写入的字节数。
async fn fetch_range(
    ctx: &ChunkWorkerContext,
    target: FetchTarget,
    written: &mut u64,
) -> Result<(), DownloadError> {
    if target.chunk.is_some_and(|c| c.is_empty()) {
        return Ok(());
    }
    if ctx.cancel.is_cancelled() {
        return Err(DownloadError::Cancelled);
    }

    debug!(
        chunk_index = target.index(),
        range = ?target.chunk.and_then(|c| c.range_header()),
        "开始下载分片"
    );

    let mut reader = tokio::select! {
        _ = ctx.cancel.cancelled() => return Err(DownloadError::Cancelled),
        reader = ctx.transport.open_range(&ctx.request, target.chunk.as_ref()) => reader?,
    };

    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut offset = target.start();

    loop {
        let n = tokio::select! {
            _ = ctx.cancel.cancelled() => return Err(DownloadError::Cancelled),
            n = reader.read(&mut buf) => n.map_err(DownloadError::BodyRead)?,
        };
        if n == 0 {
            break;
        }

        if let Some(expected) = target.expected_len {
            if *written + n as u64 > expected {
                return Err(DownloadError::ShortChunk {
                    expected,
                    received: *written + n as u64,
                });
            }
        }

        let len = ctx.sink.write_at(offset, &buf[..n]).await? as u64;
        offset += len;
        *written += len;
        ctx.progress.add(len);
    }

    if let Some(expected) = target.expected_len {
        if *written != expected {
            return Err(DownloadError::ShortChunk {
                expected,
                received: *written,
            });
        }
    }

    debug!(chunk_index = target.index(), bytes = *written, "分片下载完成");
    Ok(())
}
