//! 本地文件写入测试：预分配、任意偏移写入、冲突检测。

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::downloader::DownloadError;
use crate::file_sink::FileSink;
use crate::tests::random_content;

#[tokio::test]
async fn create_preallocates_length() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.bin");

    let sink = FileSink::create(&path, 4096, false).await.unwrap();
    assert_eq!(sink.len(), 4096);
    assert_eq!(sink.path(), path.as_path());

    let meta = tokio::fs::metadata(&path).await.unwrap();
    assert_eq!(meta.len(), 4096);
}

#[tokio::test]
async fn writes_out_of_order_land_at_their_offsets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("b.bin");
    let content = random_content(3_000);

    let sink = FileSink::create(&path, 3_000, false).await.unwrap();
    sink.write_at(2_000, &content[2_000..]).await.unwrap();
    sink.write_at(0, &content[..1_000]).await.unwrap();
    sink.write_at(1_000, &content[1_000..2_000]).await.unwrap();
    sink.flush().await.unwrap();

    assert_eq!(tokio::fs::read(&path).await.unwrap(), content);
}

#[tokio::test]
async fn concurrent_writes_do_not_interfere() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("c.bin");
    let content = Arc::new(random_content(64 * 1024));

    let sink = Arc::new(FileSink::create(&path, content.len() as u64, false).await.unwrap());
    let mut set = JoinSet::new();
    for part in 0..8usize {
        let sink = Arc::clone(&sink);
        let content = Arc::clone(&content);
        set.spawn(async move {
            let start = part * 8 * 1024;
            for offset in (start..start + 8 * 1024).step_by(512) {
                sink.write_at(offset as u64, &content[offset..offset + 512])
                    .await
                    .unwrap();
            }
        });
    }
    while let Some(res) = set.join_next().await {
        res.unwrap();
    }
    sink.flush().await.unwrap();

    assert_eq!(tokio::fs::read(&path).await.unwrap(), *content);
}

#[tokio::test]
async fn create_new_rejects_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("d.bin");
    tokio::fs::write(&path, b"old").await.unwrap();

    let err = FileSink::create(&path, 10, true).await.unwrap_err();
    assert!(matches!(err, DownloadError::FileExists(ref p) if p == &path));
    assert_eq!(tokio::fs::read(&path).await.unwrap(), b"old");
}

#[tokio::test]
async fn overwrite_truncates_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("e.bin");
    tokio::fs::write(&path, vec![7u8; 100]).await.unwrap();

    let sink = FileSink::create(&path, 10, false).await.unwrap();
    sink.flush().await.unwrap();

    assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![0u8; 10]);
}

#[tokio::test]
async fn missing_parent_directory_is_create_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("f.bin");

    let err = FileSink::create(&path, 10, false).await.unwrap_err();
    assert!(matches!(err, DownloadError::CreateFile(_)));
}

#[tokio::test]
async fn write_at_reaches_the_file_before_returning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("g.bin");
    let content = random_content(4_096);

    let sink = FileSink::create(&path, 8_192, false).await.unwrap();
    let written = sink.write_at(4_096, &content).await.unwrap();
    assert_eq!(written, 4_096);

    // 不调用 flush，另开句柄读取
    let on_disk = tokio::fs::read(&path).await.unwrap();
    assert_eq!(&on_disk[4_096..], &content[..]);
    assert_eq!(&on_disk[..4_096], &[0u8; 4_096][..]);
}
