//! 请求领域模块：调用方提交的下载请求，构建后只读。

pub mod structs;
