pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{CliConfig, EnvConfig, INDEX_NAME};
pub use crate::core::driver::{PagePlan, PaginationDriver, RunReport};
pub use crate::core::fetcher::SocrataSource;
pub use crate::core::loader::{ElasticsearchSink, IndexState};
pub use crate::utils::error::{EtlError, Result};
