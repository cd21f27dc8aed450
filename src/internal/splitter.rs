//! 分片计算：纯函数，根据文件大小与最小分片阈值切分字节区间。

pub mod calculate_burst;
pub mod chunk;

pub use calculate_burst::{calculate_burst, split_chunks};
pub use chunk::Chunk;
