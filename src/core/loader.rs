use crate::domain::model::NormalizedRecord;
use crate::domain::ports::DocumentSink;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

/// Outcome of the schema bootstrap call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Created,
    AlreadyExists,
}

/// Elasticsearch-backed implementation of [`DocumentSink`]: one `_bulk`
/// NDJSON call per batch, basic auth, no retry.
pub struct ElasticsearchSink {
    client: Client,
    host: String,
    index: String,
    username: String,
    password: String,
}

impl ElasticsearchSink {
    pub fn new(
        host: impl Into<String>,
        index: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let host: String = host.into();

        Self {
            client: Client::new(),
            host: host.trim_end_matches('/').to_string(),
            index: index.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create the destination index with its fixed schema.
    ///
    /// A 400 carrying `resource_already_exists_exception` means a previous
    /// run already created it; anything else non-2xx is a genuine failure
    /// and aborts the run before paging starts.
    pub async fn ensure_index(&self) -> Result<IndexState> {
        let response = self
            .client
            .put(format!("{}/{}", self.host, self.index))
            .basic_auth(&self.username, Some(&self.password))
            .json(&index_schema())
            .send()
            .await
            .map_err(|e| EtlError::IndexBootstrapError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(IndexState::Created);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && body.contains("resource_already_exists_exception") {
            return Ok(IndexState::AlreadyExists);
        }

        Err(EtlError::IndexBootstrapError {
            message: format!("HTTP {}: {}", status, body),
        })
    }
}

#[async_trait]
impl DocumentSink for ElasticsearchSink {
    async fn bulk_index(&self, docs: &[NormalizedRecord]) -> Result<()> {
        if docs.is_empty() {
            tracing::debug!("Empty batch, nothing to post");
            return Ok(());
        }

        // NDJSON: one action metadata line and one source line per document.
        let mut body = String::new();
        for doc in docs {
            let action = json!({"index": {"_index": &self.index, "_type": "_doc"}});
            body.push_str(&serde_json::to_string(&action)?);
            body.push('\n');
            body.push_str(&serde_json::to_string(doc)?);
            body.push('\n');
        }

        let response = self
            .client
            .post(format!("{}/_bulk", self.host))
            .basic_auth(&self.username, Some(&self.password))
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| EtlError::DestinationWriteError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EtlError::DestinationWriteError {
                message: format!("bulk call returned HTTP {}: {}", status, body),
            });
        }

        Ok(())
    }
}

fn index_schema() -> serde_json::Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "plate": { "type": "keyword" },
                "state": { "type": "keyword" },
                "license_type": { "type": "keyword" },
                "summons_number": { "type": "keyword" },
                "issue_date": { "type": "date", "format": "mm/dd/yyyy" },
                "violation_time": { "type": "keyword" },
                "violation": { "type": "keyword" },
                "fine_amount": { "type": "float" },
                "penalty_amount": { "type": "float" },
                "interest_amount": { "type": "float" },
                "reduction_amount": { "type": "float" },
                "payment_amount": { "type": "float" },
                "amount_due": { "type": "float" },
                "precinct": { "type": "keyword" },
                "county": { "type": "keyword" },
                "issuing_agency": { "type": "keyword" }
            }
        }
    })
}
