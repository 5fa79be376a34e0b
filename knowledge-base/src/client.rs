//! HTTP retriever for a managed knowledge-base service.
//!
//! POST {url}/knowledgebases/{id}/retrieve
//! ```json
//! {"retrievalQuery":{"text":"..."},
//!  "retrievalConfiguration":{"vectorSearchConfiguration":{"numberOfResults":3}}}
//! ```
//! Request signing is left to the gateway in front of the service; an
//! optional bearer token is forwarded as-is.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::kb_error::KbError;
use crate::retriever::Retriever;
use crate::structs::{retrieval_config::RetrievalConfig, retrieval_hit::RetrievalHit};

/// Metadata key carrying the chunk id in managed-KB responses.
pub const CHUNK_ID_KEY: &str = "x-amz-bedrock-kb-chunk-id";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveBody<'a> {
    retrieval_query: RetrievalQuery<'a>,
    retrieval_configuration: RetrievalConfiguration,
}

#[derive(Debug, Serialize)]
struct RetrievalQuery<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfiguration {
    vector_search_configuration: VectorSearchConfiguration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VectorSearchConfiguration {
    number_of_results: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveResponse {
    #[serde(default)]
    retrieval_results: Vec<WireResult>,
}

#[derive(Debug, Default, Deserialize)]
struct WireResult {
    #[serde(default)]
    content: Option<WireContent>,
    #[serde(default)]
    location: Option<WireLocation>,
    #[serde(default)]
    score: Option<f32>,
    #[serde(default)]
    metadata: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct WireContent {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLocation {
    #[serde(default)]
    s3_location: Option<WireS3Location>,
    #[serde(default)]
    web_location: Option<WireUrlLocation>,
}

#[derive(Debug, Default, Deserialize)]
struct WireS3Location {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireUrlLocation {
    #[serde(default)]
    url: Option<String>,
}

impl From<WireResult> for RetrievalHit {
    fn from(w: WireResult) -> Self {
        let uri = w.location.and_then(|l| {
            l.s3_location
                .and_then(|s| s.uri)
                .or_else(|| l.web_location.and_then(|u| u.url))
        });
        let chunk_id = w
            .metadata
            .as_ref()
            .and_then(|m| m.get(CHUNK_ID_KEY))
            .and_then(Value::as_str)
            .map(str::to_string);
        RetrievalHit {
            text: w.content.and_then(|c| c.text),
            uri,
            score: w.score,
            chunk_id,
        }
    }
}

/// Knowledge-base ids are opaque, but must be safe as a URL path segment.
pub fn validate_kb_id(id: &str) -> Result<&str, KbError> {
    let id = id.trim();
    let ok = !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(id)
    } else {
        Err(KbError::InvalidKnowledgeBase(id.to_string()))
    }
}

/// Retriever backed by the managed service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRetriever {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRetriever {
    /// Returns `Ok(None)` when retrieval is disabled (no URL configured).
    pub fn from_config(cfg: &RetrievalConfig) -> Result<Option<Self>, KbError> {
        let Some(url) = cfg.url.as_deref() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Some(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        }))
    }

    fn url_for(&self, kb_id: &str) -> String {
        format!("{}/knowledgebases/{}/retrieve", self.base_url, kb_id)
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(
        &self,
        knowledge_base_id: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RetrievalHit>, KbError> {
        let kb_id = validate_kb_id(knowledge_base_id)?;
        let url = self.url_for(kb_id);
        debug!(%url, max_results, "retrieve");

        let body = RetrieveBody {
            retrieval_query: RetrievalQuery { text: query },
            retrieval_configuration: RetrievalConfiguration {
                vector_search_configuration: VectorSearchConfiguration {
                    number_of_results: max_results,
                },
            },
        };

        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(240).collect();
            return Err(KbError::Status {
                status: status.as_u16(),
                snippet,
            });
        }

        let parsed: RetrieveResponse = resp
            .json()
            .await
            .map_err(|e| KbError::Malformed(e.to_string()))?;

        Ok(parsed
            .retrieval_results
            .into_iter()
            .map(RetrievalHit::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_result_maps_to_hit() {
        let parsed: RetrieveResponse = serde_json::from_value(json!({
            "retrievalResults": [{
                "content": {"text": "Reset via settings."},
                "location": {"type": "S3", "s3Location": {"uri": "s3://kb/docs/reset_password.txt"}},
                "score": 0.8,
                "metadata": {"x-amz-bedrock-kb-chunk-id": "chunk-abc"}
            }, {}]
        }))
        .unwrap();
        let hits: Vec<RetrievalHit> = parsed.retrieval_results.into_iter().map(Into::into).collect();
        assert_eq!(hits[0].text.as_deref(), Some("Reset via settings."));
        assert_eq!(hits[0].uri.as_deref(), Some("s3://kb/docs/reset_password.txt"));
        assert_eq!(hits[0].chunk_id.as_deref(), Some("chunk-abc"));
        assert_eq!(hits[1], RetrievalHit::default());
    }

    #[test]
    fn request_body_shape() {
        let body = RetrieveBody {
            retrieval_query: RetrievalQuery { text: "q" },
            retrieval_configuration: RetrievalConfiguration {
                vector_search_configuration: VectorSearchConfiguration {
                    number_of_results: 3,
                },
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "retrievalQuery": {"text": "q"},
                "retrievalConfiguration": {"vectorSearchConfiguration": {"numberOfResults": 3}}
            })
        );
    }

    #[test]
    fn kb_id_must_be_path_safe() {
        assert_eq!(validate_kb_id(" KB123-x_y ").unwrap(), "KB123-x_y");
        assert!(validate_kb_id("").is_err());
        assert!(validate_kb_id("../admin").is_err());
    }

    #[test]
    fn disabled_without_url() {
        assert!(
            HttpRetriever::from_config(&RetrievalConfig::default())
                .unwrap()
                .is_none()
        );
    }
}
