//! 传输层接口测试：用内存传输层注入中途失败、挂起，验证重试、取消与空文件。

use std::sync::atomic::Ordering;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;

use crate::downloader::{DownloadError, Downloader};
use crate::request::{Checksum, Request};
use crate::tests::{MEMORY_FILE_NAME, MemoryTransport, random_content, test_config};

const MEMORY_URL: &str = "mem://bucket/object";

#[tokio::test]
async fn custom_transport_is_selected_by_scheme() {
    let content = random_content(10_000);
    let transport = MemoryTransport::new(content.clone());
    let opened = transport.opened();
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(test_config(dir.path(), 3_000))
        .unwrap()
        .with_transport(transport);

    let outcome = downloader
        .download(Request::get(MEMORY_URL).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.path, dir.path().join(MEMORY_FILE_NAME));
    assert_eq!(outcome.chunk_count, 3);
    assert_eq!(opened.load(Ordering::SeqCst), 3);
    assert_eq!(tokio::fs::read(&outcome.path).await.unwrap(), content);
}

#[tokio::test]
async fn mid_stream_error_fails_the_chunk() {
    let transport = MemoryTransport::new(random_content(10_000)).fail_chunk(1, 1);
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(test_config(dir.path(), 3_000))
        .unwrap()
        .with_transport(transport);

    let err = downloader
        .download(Request::get(MEMORY_URL).unwrap())
        .await
        .unwrap_err();

    match err {
        DownloadError::ChunkFailed { chunk_index, source } => {
            assert_eq!(chunk_index, 1);
            assert!(matches!(*source, DownloadError::BodyRead(_)));
        }
        other => panic!("预期 ChunkFailed，得到 {other:?}"),
    }
    assert!(!dir.path().join(MEMORY_FILE_NAME).exists());
}

#[tokio::test]
async fn failed_chunk_is_retried() {
    let content = random_content(10_000);
    let transport = MemoryTransport::new(content.clone()).fail_chunk(2, 2);
    let opened = transport.opened();
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), 3_000).with_retries(2, 10);
    let downloader = Downloader::new(config).unwrap().with_transport(transport);

    let task = downloader.task(Request::get(MEMORY_URL).unwrap());
    let progress = task.progress();
    let outcome = task.send().await.unwrap();

    assert_eq!(tokio::fs::read(&outcome.path).await.unwrap(), content);
    assert_eq!(outcome.bytes_written, 10_000);
    // 3 个分片 + 分片 2 的两次重试
    assert_eq!(opened.load(Ordering::SeqCst), 5);
    assert_eq!(progress.borrow().bytes_done, 10_000);
}

#[tokio::test]
async fn retries_are_bounded() {
    let transport = MemoryTransport::new(random_content(10_000)).fail_chunk(0, 5);
    let opened = transport.opened();
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), 3_000).with_retries(1, 10);
    let downloader = Downloader::new(config).unwrap().with_transport(transport);

    let err = downloader
        .download(Request::get(MEMORY_URL).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::ChunkFailed { chunk_index: 0, .. }));
    // 分片 0 两次尝试；其余分片最多各一次
    assert!(opened.load(Ordering::SeqCst) <= 4);
}

#[tokio::test]
async fn cancel_stops_all_chunks_and_removes_file() {
    let transport = MemoryTransport::new(random_content(10_000)).hang();
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(test_config(dir.path(), 3_000))
        .unwrap()
        .with_transport(transport);

    let task = downloader.task(Request::get(MEMORY_URL).unwrap());
    let cancel = task.cancel_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let err = tokio::time::timeout(Duration::from_secs(5), task.send())
        .await
        .expect("取消后下载应立即结束")
        .unwrap_err();

    assert!(matches!(err, DownloadError::Cancelled));
    assert!(!dir.path().join(MEMORY_FILE_NAME).exists());
}

#[tokio::test]
async fn pre_cancelled_token_downloads_nothing() {
    let transport = MemoryTransport::new(random_content(10_000));
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(test_config(dir.path(), 3_000))
        .unwrap()
        .with_transport(transport);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = downloader
        .download_with_cancel(Request::get(MEMORY_URL).unwrap(), cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Cancelled));
    assert!(!dir.path().join(MEMORY_FILE_NAME).exists());
}

#[tokio::test]
async fn chunk_failure_does_not_cancel_caller_token() {
    let transport = MemoryTransport::new(random_content(10_000)).fail_chunk(0, 1);
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(test_config(dir.path(), 3_000))
        .unwrap()
        .with_transport(transport);

    let cancel = CancellationToken::new();
    let result = downloader
        .download_with_cancel(Request::get(MEMORY_URL).unwrap(), cancel.clone())
        .await;

    assert!(result.is_err());
    assert!(!cancel.is_cancelled());
}

#[tokio::test]
async fn zero_size_range_download_opens_no_stream() {
    let transport = MemoryTransport::new(Vec::new());
    let opened = transport.opened();
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(test_config(dir.path(), 3_000))
        .unwrap()
        .with_transport(transport);

    let outcome = downloader
        .download(Request::get(MEMORY_URL).unwrap())
        .await
        .unwrap();

    assert!(outcome.range_used);
    assert_eq!(outcome.chunk_count, 1);
    assert_eq!(outcome.bytes_written, 0);
    assert_eq!(opened.load(Ordering::SeqCst), 0);
    assert_eq!(tokio::fs::metadata(&outcome.path).await.unwrap().len(), 0);
}

#[tokio::test]
async fn several_failed_chunks_are_reported_in_order() {
    let transport = MemoryTransport::new(random_content(10_000)).fail_at_start(&[2, 0]);
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(test_config(dir.path(), 3_000))
        .unwrap()
        .with_transport(transport);

    let err = downloader
        .download(Request::get(MEMORY_URL).unwrap())
        .await
        .unwrap_err();

    let errors = match err {
        DownloadError::MultipleChunksFailed(errors) => errors,
        other => panic!("预期 MultipleChunksFailed，得到 {other:?}"),
    };
    let indices: Vec<usize> = errors
        .iter()
        .map(|e| match e {
            DownloadError::ChunkFailed { chunk_index, source } => {
                assert!(matches!(**source, DownloadError::BodyRead(_)));
                *chunk_index
            }
            other => panic!("预期 ChunkFailed，得到 {other:?}"),
        })
        .collect();
    assert_eq!(indices, vec![0, 2]);
    assert!(!dir.path().join(MEMORY_FILE_NAME).exists());
}

#[tokio::test]
async fn cancel_after_last_byte_still_reports_cancelled() {
    let cancel = CancellationToken::new();
    let content = random_content(1_000);
    let transport = MemoryTransport::new(content.clone()).cancel_after_body(cancel.clone());
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(test_config(dir.path(), 3_000))
        .unwrap()
        .with_transport(transport);
    let hex = format!("{:x}", Sha256::digest(&content));

    let err = downloader
        .download_with_cancel(
            Request::get(MEMORY_URL)
                .unwrap()
                .checksum(Checksum::sha256(&hex)),
            cancel,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Cancelled));
    assert!(!dir.path().join(MEMORY_FILE_NAME).exists());
}
