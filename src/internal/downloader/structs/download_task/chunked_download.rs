//! 分片下载：每个分片一个任务，全部结束后汇总结果。

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::internal::downloader::structs::download_error::DownloadError;
use crate::internal::splitter::chunk::Chunk;

use super::chunk_worker::{ChunkWorkerContext, FetchTarget, fetch_with_retry};

/// 单个分片任务的结果：(分片序号, 写入字节数或错误)
type ChunkTaskResult = (usize, Result<u64, DownloadError>);

/// 为每个分片 spawn 一个任务，等待全部结束（join 屏障）后返回写入的总字节数。
///
/// 任一分片失败会取消其余分片；失败的分片汇总为 [`DownloadError::ChunkFailed`]
/// 或 [`DownloadError::MultipleChunksFailed`]。`ctx.cancel` 被外部取消时返回 [`DownloadError::Cancelled`]。
pub(super) async fn run_chunked_download(
    ctx: Arc<ChunkWorkerContext>,
    chunks: Vec<Chunk>,
) -> Result<u64, DownloadError> {
    let mut tasks: JoinSet<ChunkTaskResult> = JoinSet::new();

    for chunk in chunks {
        let ctx = Arc::clone(&ctx);
        tasks.spawn(async move {
            let result = fetch_with_retry(&ctx, FetchTarget::chunk(chunk)).await;
            (chunk.index, result)
        });
    }

    let mut failures: Vec<(usize, DownloadError)> = Vec::new();
    let mut cancelled = false;
    let mut total = 0u64;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(written))) => total += written,
            Ok((_, Err(DownloadError::Cancelled))) => cancelled = true,
            Ok((index, Err(e))) => {
                warn!(chunk_index = index, error = %e, "分片失败，取消其余分片");
                ctx.cancel.cancel();
                failures.push((index, e));
            }
            Err(join_err) => {
                warn!(error = %join_err, "分片任务异常退出，取消其余分片");
                ctx.cancel.cancel();
                failures.push((usize::MAX, DownloadError::TaskJoin(join_err)));
            }
        }
    }

    if !failures.is_empty() {
        failures.sort_by_key(|(index, _)| *index);
        let mut errors: Vec<DownloadError> = failures
            .into_iter()
            .map(|(chunk_index, source)| match source {
                DownloadError::TaskJoin(_) => source,
                _ => DownloadError::ChunkFailed {
                    chunk_index,
                    source: Box::new(source),
                },
            })
            .collect();
        return Err(if errors.len() == 1 {
            errors.remove(0)
        } else {
            DownloadError::MultipleChunksFailed(errors)
        });
    }

    if cancelled {
        return Err(DownloadError::Cancelled);
    }

    debug!(bytes = total, "全部分片下载完成");
    Ok(total)
}
