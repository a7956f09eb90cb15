use crate::error::Result;
use futures::future::join_all;
use log::{debug, warn};
use reqwest::header;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

const BATCH_SIZE: usize = 300;

/// Client for the external node-annotation service. Front-end plumbing uses
/// it to decorate summary nodes; the summarizer core never calls it.
pub struct AnnotationClient {
    base_url: String,
    client: reqwest::Client,
}

fn annotator_endpoint(base_url: &str) -> String {
    format!("{}/annotator", base_url.trim_end_matches('/'))
}

fn batches(curies: &[String]) -> Vec<&[String]> {
    curies.chunks(BATCH_SIZE).collect()
}

impl AnnotationClient {
    pub fn new(base_url: impl Into<String>) -> AnnotationClient {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .default_headers(headers)
            .build()
            .expect("Could not build reqwest client");
        AnnotationClient {
            base_url: base_url.into(),
            client,
        }
    }

    /// Fetches annotation records for the given curies, batched. Batches
    /// that fail are logged and skipped; the rest still annotate.
    pub async fn annotate(&self, curies: &[String]) -> Result<HashMap<String, Value>> {
        let requests: Vec<_> = batches(curies).into_iter().map(|batch| self.annotate_batch(batch)).collect();
        let mut annotations = HashMap::with_capacity(curies.len());
        for outcome in join_all(requests).await {
            match outcome {
                Ok(batch) => annotations.extend(batch),
                Err(e) => warn!("annotation batch failed: {}", e),
            }
        }
        Ok(annotations)
    }

    async fn annotate_batch(&self, curies: &[String]) -> Result<HashMap<String, Value>> {
        debug!("annotating {} curies", curies.len());
        let response = self
            .client
            .post(annotator_endpoint(&self.base_url))
            .json(&serde_json::json!({ "ids": curies }))
            .send()
            .await?;
        let annotations: HashMap<String, Value> = response.json().await?;
        Ok(annotations)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn endpoint_formatting() {
        assert_eq!(annotator_endpoint("http://localhost:8000"), "http://localhost:8000/annotator");
        assert_eq!(annotator_endpoint("http://localhost:8000/"), "http://localhost:8000/annotator");
    }

    #[test]
    fn batching_boundaries() {
        let curies: Vec<String> = (0..301).map(|i| format!("CHEBI:{}", i)).collect();
        let batched = batches(&curies);
        assert_eq!(batched.len(), 2);
        assert_eq!(batched[0].len(), 300);
        assert_eq!(batched[1].len(), 1);
        assert_eq!(batched[1][0], "CHEBI:300");

        let exact: Vec<String> = (0..300).map(|i| format!("CHEBI:{}", i)).collect();
        assert_eq!(batches(&exact).len(), 1);

        assert!(batches(&[]).is_empty());
    }

    #[test]
    fn client_builds_without_a_server() {
        let client = AnnotationClient::new("http://localhost:8000");
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
