pub mod adapter;
pub mod config;
pub mod error;
pub mod export;
pub mod shape;
pub mod source;

pub use adapter::{ContentAdapter, FetchOutcome, PagedFetch, SlugLookup};
pub use config::IndexerConfig;
pub use error::{AdapterError, AdapterResult};
pub use source::{ContentSource, FindQuery, FindResponse, PayloadClient};
