/// 分片：交给单个任务下载的连续字节区间。
///
/// 同一次下载的全部分片按 `index` 升序、首尾相接、互不重叠，合起来恰好覆盖 `[0, size)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// 分片序号（从 0 开始）
    pub index: usize,
    /// 起始偏移（字节）
    pub start: u64,
    /// 分片长度（字节）；只有总大小为 0 时才会出现空分片
    pub len: u64,
}

impl Chunk {
    /// 结束偏移（含）；空分片返回 `None`。
    pub fn end(&self) -> Option<u64> {
        if self.len == 0 {
            None
        } else {
            Some(self.start + self.len - 1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Range 请求头：`bytes=start-end`，end 为含上界；空分片无需请求。
    pub fn range_header(&self) -> Option<String> {
        self.end().map(|end| format!("bytes={}-{}", self.start, end))
    }
}
