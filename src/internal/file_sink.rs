//! 预分配大小的本地文件，接受任意偏移处的写入。

use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::internal::downloader::structs::download_error::DownloadError;

/// 分片下载的写入目标
///
/// 创建时一次性把文件长度设为总大小，之后各分片任务并发写入互不重叠的区间。
/// 区间不重叠由分片计算保证；内部的互斥锁只用来保护共享文件句柄的读写位置
/// （seek 与 write 必须成对执行），不提供任何分片之间的顺序保证。
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
    len: u64,
}

impl FileSink {
    /// 创建文件并预分配 `len` 字节。
    ///
    /// `create_new` 为 `true` 时目标已存在会返回 [`DownloadError::FileExists`]，否则截断覆盖。
    pub async fn create(
        path: impl AsRef<Path>,
        len: u64,
        create_new: bool,
    ) -> Result<Self, DownloadError> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.write(true);
        if create_new {
            options.create_new(true);
        } else {
            options.create(true).truncate(true);
        }

        let file = options.open(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                DownloadError::FileExists(path.clone())
            } else {
                DownloadError::CreateFile(e)
            }
        })?;
        file.set_len(len)
            .await
            .map_err(DownloadError::PreallocateFile)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
            len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 预分配的长度
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 在 `offset` 处写入 `buf`，返回写入的字节数。
    ///
    /// 返回时数据已交给操作系统，写入错误只会报给本次调用。
    pub async fn write_at(&self, offset: u64, buf: &[u8]) -> Result<usize, DownloadError> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut file = self.file.lock().await;
        file.seek(SeekFrom::Start(offset))
            .await
            .map_err(DownloadError::SeekFile)?;
        file.write_all(buf)
            .await
            .map_err(DownloadError::WriteFile)?;
        // tokio 的文件写入在后台线程完成，不等待的话错误会报给下一个写入者
        file.flush().await.map_err(DownloadError::WriteFile)?;
        Ok(buf.len())
    }

    /// 刷新缓冲并落盘；所有分片结束后调用一次。
    pub async fn flush(&self) -> Result<(), DownloadError> {
        let mut file = self.file.lock().await;
        file.flush().await.map_err(DownloadError::FlushFile)?;
        file.sync_all().await.map_err(DownloadError::FlushFile)
    }
}
