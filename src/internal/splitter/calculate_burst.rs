use super::chunk::Chunk;

/// 计算分片数量与名义分片大小。
///
/// - `count = max(1, size / min_burst)`
/// - `chunk_size = size / count`
///
/// 两处均为向下取整；余数由最后一个分片承担，见 [`split_chunks`]。
/// `min_burst` 为 0 时按 1 处理（配置校验会提前拒绝 0）。
pub fn calculate_burst(size: u64, min_burst: u64) -> (u64, u64) {
    let count = (size / min_burst.max(1)).max(1);
    (count, size / count)
}

/// 按 [`calculate_burst`] 切出全部分片，最后一个分片吸收余数。
pub fn split_chunks(size: u64, min_burst: u64) -> Vec<Chunk> {
    let (count, chunk_size) = calculate_burst(size, min_burst);

    (0..count)
        .map(|i| {
            let start = i * chunk_size;
            let end = if i == count - 1 {
                size
            } else {
                start + chunk_size
            };
            Chunk {
                index: i as usize,
                start,
                len: end - start,
            }
        })
        .collect()
}
