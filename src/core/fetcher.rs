use crate::domain::model::RawRecord;
use crate::domain::ports::RecordSource;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Public open-data endpoint hosting the parking-violation dataset.
pub const DEFAULT_BASE_URL: &str = "https://data.cityofnewyork.us";

// Some offsets take tens of seconds server-side; the client default would
// time out long before the page arrives.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Socrata-backed implementation of [`RecordSource`]. One bounded fetch per
/// call, no retry: a failed call is the driver's problem.
pub struct SocrataSource {
    client: Client,
    base_url: String,
    dataset_id: String,
    app_token: String,
}

impl SocrataSource {
    pub fn new(
        base_url: impl Into<String>,
        dataset_id: impl Into<String>,
        app_token: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset_id: dataset_id.into(),
            app_token: app_token.into(),
        })
    }

    fn resource_url(&self) -> String {
        format!("{}/resource/{}.json", self.base_url, self.dataset_id)
    }

    async fn get_rows(
        &self,
        query: &[(&str, String)],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let response = self
            .client
            .get(self.resource_url())
            .header("X-App-Token", &self.app_token)
            .query(query)
            .send()
            .await
            .map_err(|e| EtlError::SourceUnavailableError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::SourceUnavailableError {
                message: format!("source returned HTTP {}", status),
            });
        }

        response
            .json()
            .await
            .map_err(|e| EtlError::SourceUnavailableError {
                message: format!("invalid response body: {}", e),
            })
    }
}

#[async_trait]
impl RecordSource for SocrataSource {
    async fn count(&self) -> Result<u64> {
        let rows = self
            .get_rows(&[("$select", "COUNT(*)".to_string())])
            .await?;

        // SoQL aliases the aggregate column "COUNT"; fall back to whatever
        // single column the row carries.
        let row = rows
            .first()
            .ok_or_else(|| EtlError::SourceUnavailableError {
                message: "count query returned no rows".to_string(),
            })?;
        let value = row
            .get("COUNT")
            .or_else(|| row.values().next())
            .ok_or_else(|| EtlError::SourceUnavailableError {
                message: "count query returned an empty row".to_string(),
            })?;

        parse_count(value)
    }

    async fn fetch_page(&self, limit: usize, offset: u64) -> Result<Vec<RawRecord>> {
        tracing::debug!("Fetching page: $limit={} $offset={}", limit, offset);

        let rows = self
            .get_rows(&[
                ("$limit", limit.to_string()),
                ("$offset", offset.to_string()),
            ])
            .await?;

        Ok(rows.into_iter().map(|data| RawRecord { data }).collect())
    }
}

fn parse_count(value: &serde_json::Value) -> Result<u64> {
    let parsed = match value {
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    };

    parsed.ok_or_else(|| EtlError::SourceUnavailableError {
        message: format!("unparsable row count: {}", value),
    })
}
