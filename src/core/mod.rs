pub mod driver;
pub mod fetcher;
pub mod loader;
pub mod normalizer;

pub use crate::domain::model::{NormalizedRecord, RawRecord};
pub use crate::domain::ports::{DocumentSink, RecordSource};
pub use crate::utils::error::Result;
