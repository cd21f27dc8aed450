pub mod downloader;
pub mod entrance;
pub mod file_sink;
pub mod request;
pub mod splitter;
pub mod transport;
