pub mod resolution;

pub use resolution::Resolution;
