//! 传输层领域模块：探测远程资源并按区间读取；下载器按 URL 协议选择实现。

pub mod http;
pub mod structs;
pub mod traits;
