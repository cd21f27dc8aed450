//! 下载完成后的文件校验。

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::internal::downloader::structs::download_error::DownloadError;
use crate::internal::request::structs::checksum::Checksum;

const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// 计算文件的 SHA-256（十六进制小写）。
pub(super) async fn sha256_file(path: &Path) -> Result<String, DownloadError> {
    let mut file = File::open(path).await.map_err(DownloadError::ReadFile)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_BUFFER_SIZE];
    loop {
        let n = file.read(&mut buf).await.map_err(DownloadError::ReadFile)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

pub(super) async fn verify_checksum(path: &Path, checksum: &Checksum) -> Result<(), DownloadError> {
    let actual = match checksum {
        Checksum::Sha256(_) => sha256_file(path).await?,
    };
    if actual != checksum.expected_hex() {
        return Err(DownloadError::ChecksumMismatch {
            expected: checksum.expected_hex().to_string(),
            actual,
        });
    }
    Ok(())
}
