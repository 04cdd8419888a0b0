//! # Dataset Hub Client
//!
//! Pages through the Hugging Face datasets-server `/rows` endpoint to pull
//! a dataset's training split. The server caps page size at 100 rows, so
//! retrieval is a sequence of offset/length requests until the reported
//! total is reached.

use anyhow::{Context, Result};
use entitag_core::Dataset;
use serde::Deserialize;
use tracing::info;

/// Public datasets-server endpoint.
const DEFAULT_BASE_URL: &str = "https://datasets-server.huggingface.co";

/// Maximum rows per page accepted by the server.
const PAGE_SIZE: usize = 100;

/// One raw dataset example: parallel tokens and integer tag codes.
///
/// CoNLL-2003 and WNUT-17 call the tag column `ner_tags`; OntoNotes calls
/// it `tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaggedExample {
    pub tokens: Vec<String>,
    #[serde(alias = "tags")]
    pub ner_tags: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct RowEnvelope {
    row: TaggedExample,
}

#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEnvelope>,
    num_rows_total: usize,
}

/// Client for the datasets-server rows API.
pub struct HubClient {
    http: reqwest::Client,
    base_url: String,
}

impl HubClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different server (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the training split of a dataset, optionally capped at `limit`
    /// examples. Any transport or decode failure propagates; there are no
    /// retries.
    pub async fn fetch_train_split(
        &self,
        dataset: Dataset,
        limit: Option<usize>,
    ) -> Result<Vec<TaggedExample>> {
        let mut examples = Vec::new();
        let mut offset = 0usize;

        loop {
            let page = self
                .fetch_page(dataset, offset)
                .await
                .with_context(|| format!("fetching {dataset} rows at offset {offset}"))?;

            let page_len = page.rows.len();
            examples.extend(page.rows.into_iter().map(|r| r.row));

            if offset == 0 {
                info!(
                    dataset = %dataset,
                    total = page.num_rows_total,
                    "fetching training split"
                );
            }

            offset += page_len;
            let done = page_len == 0 || offset >= page.num_rows_total;
            let capped = limit.is_some_and(|l| examples.len() >= l);
            if done || capped {
                break;
            }
            if offset % 5000 == 0 {
                info!(dataset = %dataset, fetched = offset, "download progress");
            }
        }

        if let Some(l) = limit {
            examples.truncate(l);
        }
        Ok(examples)
    }

    async fn fetch_page(&self, dataset: Dataset, offset: usize) -> Result<RowsPage> {
        let url = format!("{}/rows", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("dataset", dataset.hub_dataset().to_string()),
                ("config", dataset.hub_config().to_string()),
                ("split", "train".to_string()),
                ("offset", offset.to_string()),
                ("length", PAGE_SIZE.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<RowsPage>().await?)
    }
}

impl Default for HubClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_decodes_ner_tags_field() {
        let json = r#"{"tokens": ["EU", "rejects"], "ner_tags": [3, 0]}"#;
        let example: TaggedExample = serde_json::from_str(json).unwrap();
        assert_eq!(example.tokens, vec!["EU", "rejects"]);
        assert_eq!(example.ner_tags, vec![3, 0]);
    }

    #[test]
    fn test_example_decodes_tags_alias() {
        let json = r#"{"tokens": ["Today"], "tags": [21]}"#;
        let example: TaggedExample = serde_json::from_str(json).unwrap();
        assert_eq!(example.ner_tags, vec![21]);
    }

    #[test]
    fn test_rows_page_shape() {
        let json = r#"{
            "features": [],
            "rows": [{"row_idx": 0, "row": {"tokens": ["a"], "ner_tags": [0]}}],
            "num_rows_total": 14041
        }"#;
        let page: RowsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.num_rows_total, 14041);
    }
}
