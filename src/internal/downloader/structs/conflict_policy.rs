use serde::{Deserialize, Serialize};

/// 目标文件已存在时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// 截断并覆盖已有文件
    #[default]
    Overwrite,
    /// 返回 [`DownloadError::FileExists`](super::download_error::DownloadError::FileExists)，不动已有文件
    Error,
    /// 追加序号另存，如 `a (1).txt`
    Rename,
}
