//! 目标文件：按冲突策略确定路径并创建预分配的 [`FileSink`]。

use std::path::Path;

use tracing::debug;

use crate::internal::downloader::structs::conflict_policy::ConflictPolicy;
use crate::internal::downloader::structs::download_error::DownloadError;
use crate::internal::file_sink::FileSink;

/// 另存时最多尝试的序号
const MAX_RENAME_ATTEMPTS: usize = 1000;

/// 在 `dir` 下创建名为 `name`、长度为 `size` 的文件。
pub(super) async fn open_destination(
    dir: &Path,
    name: &str,
    size: u64,
    policy: ConflictPolicy,
) -> Result<FileSink, DownloadError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(DownloadError::CreateFile)?;

    let path = dir.join(name);
    match policy {
        ConflictPolicy::Overwrite => FileSink::create(&path, size, false).await,
        ConflictPolicy::Error => FileSink::create(&path, size, true).await,
        ConflictPolicy::Rename => {
            let (stem, ext) = split_extension(name);
            for i in 0..MAX_RENAME_ATTEMPTS {
                let candidate = if i == 0 {
                    path.clone()
                } else {
                    dir.join(format!("{stem} ({i}){ext}"))
                };
                match FileSink::create(&candidate, size, true).await {
                    Err(DownloadError::FileExists(_)) => {
                        debug!(path = %candidate.display(), "文件已存在，尝试下一个序号");
                    }
                    other => return other,
                }
            }
            Err(DownloadError::FileExists(path))
        }
    }
}

/// `a.tar.gz` => (`a.tar`, `.gz`)；以 `.` 开头的隐藏文件不拆分。
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], &name[pos..]),
        _ => (name, ""),
    }
}
