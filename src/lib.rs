/// 内部实现的模块
mod internal;

#[cfg(test)]
mod tests;

/// 导出核心入口函数
pub use internal::entrance::download::*;

pub mod request {
    use crate::internal;
    pub use internal::request::structs::*;
}

/// 分片计算，纯函数
pub mod splitter {
    use crate::internal;
    pub use internal::splitter::*;
}

/// 传输层：自定义协议实现 [`transport::Transport`] 后注册到下载器即可
pub mod transport {
    use crate::internal;
    pub use internal::transport::http::HttpTransport;
    pub use internal::transport::http::headers;
    pub use internal::transport::structs::*;
    pub use internal::transport::traits::*;
}

pub mod file_sink {
    use crate::internal;
    pub use internal::file_sink::FileSink;
}

pub mod downloader {
    use crate::internal;
    // 结构体模型与入口（以 lib 为中心，此处统一导出）
    pub use internal::downloader::structs::*;
}
