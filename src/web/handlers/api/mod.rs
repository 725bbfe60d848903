//! API 处理器

pub mod cache;
pub mod proxy;
pub mod translation;

pub use cache::*;
pub use proxy::*;
pub use translation::*;
