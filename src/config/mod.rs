use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;

/// Destination index name. Fixed; could have been passed from cmd as well.
pub const INDEX_NAME: &str = "nycparkviolationdataset";

#[derive(Debug, Clone, Parser)]
#[command(name = "violations-etl")]
#[command(about = "Batch-index parking violation records into Elasticsearch")]
pub struct CliConfig {
    /// How many rows to fetch per page
    #[arg(long = "page_size")]
    pub page_size: usize,

    /// How many pages to fetch (derived from a source count query when omitted)
    #[arg(long = "num_pages")]
    pub num_pages: Option<u64>,

    /// Starting offset to fetch from
    #[arg(long = "init_offset")]
    pub init_offset: Option<u64>,

    /// Enable verbose output
    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log CPU/memory usage while the job runs
    #[arg(long)]
    pub monitor: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("page_size", self.page_size, 1)?;
        Ok(())
    }
}

/// Required environment values, read once at startup. The process aborts
/// before any work if one is absent.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub dataset_id: String,
    pub app_token: String,
    pub es_host: String,
    pub es_username: String,
    pub es_password: String,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String> {
            lookup(name).ok_or_else(|| EtlError::MissingConfigError {
                field: name.to_string(),
            })
        };

        Ok(Self {
            dataset_id: require("DATASET_ID")?,
            app_token: require("APP_TOKEN")?,
            es_host: require("ES_HOST")?,
            es_username: require("ES_USERNAME")?,
            es_password: require("ES_PASSWORD")?,
        })
    }
}

impl Validate for EnvConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("DATASET_ID", &self.dataset_id)?;
        validation::validate_non_empty_string("APP_TOKEN", &self.app_token)?;
        validation::validate_url("ES_HOST", &self.es_host)?;
        validation::validate_non_empty_string("ES_USERNAME", &self.es_username)?;
        validation::validate_non_empty_string("ES_PASSWORD", &self.es_password)?;
        Ok(())
    }
}
