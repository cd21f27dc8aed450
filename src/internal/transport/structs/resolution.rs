/// 探测结果：文件名、总大小、是否支持 Range 请求。
///
/// 每次下载只解析一次，由下载器持有并立即使用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// 解析出的文件名（不含目录）
    pub name: String,
    /// 文件总大小（字节）；未知时为 0
    pub size: u64,
    /// 服务器是否支持 Range 请求（探测响应为 206）
    pub range_supported: bool,
    /// 服务器是否给出了总大小（`Content-Range` 总长为 `*` 或缺少长度头时为 `false`）
    pub size_known: bool,
}
