pub mod transport;

pub use transport::{BodyReader, Transport};
