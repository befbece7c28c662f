pub mod compression;
pub mod models;

// 重新导出常用类型和函数
pub use compression::{to_compressed, from_compressed, to_binary, from_binary, validate_compressed_data};
pub use models::{ContentItem, ContentKind, ContentSnapshot, MediaRef};
