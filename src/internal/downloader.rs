//! 下载器领域模块：探测 → 预分配文件 → 分片 → 并发下载 → 汇总结果。
//!
//! 使用方式：`Downloader::new(config)?.download(request).await`
//! 对外导出以 [`crate::downloader`] 为准，此处仅做模块划分。

pub mod structs;
