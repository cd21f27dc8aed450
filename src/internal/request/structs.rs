pub mod checksum;
pub mod request;

pub use checksum::Checksum;
pub use request::Request;
