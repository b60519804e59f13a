pub mod archive;
pub mod vote;
pub mod statistics;
pub mod article;

pub use archive::*;
pub use vote::*;
pub use statistics::*;
pub use article::*;
