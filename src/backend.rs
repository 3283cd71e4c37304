use std::path::Path;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced to the UI. Each variant carries the backend's own error
/// text (the body of a non-2xx response, or the transport error's display).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Upload(String),
    #[error("{0}")]
    Query(String),
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    #[serde(rename = "topK")]
    top_k: u32,
}

/// Answer payload from `/api/ask`. A 2xx response without `answer` is a
/// decode failure and is reported as a query error.
#[derive(Deserialize, Debug, Clone)]
pub struct Answer {
    pub answer: String,
}

/// Ingestion receipt from `/api/documents/upload`.
#[derive(Deserialize, Debug, Clone)]
pub struct UploadReceipt {
    pub filename: String,
}

/// Thin client for the document Q&A backend. No retry, timeout, or caching;
/// resilience belongs to the backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a file to the ingestion endpoint as a multipart request with the
    /// binary content and an uploader tag.
    pub async fn upload_file(
        &self,
        path: &Path,
        name: &str,
        uploaded_by: &str,
    ) -> Result<UploadReceipt, BackendError> {
        let url = format!("{}/api/documents/upload", self.base_url);

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| BackendError::Upload(e.to_string()))?;

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(name.to_string()))
            .text("uploadedBy", uploaded_by.to_string());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Upload(body));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Upload(e.to_string()))
    }

    /// Submit a question with a result-count hint to the query endpoint.
    pub async fn ask_question(&self, question: &str, top_k: u32) -> Result<Answer, BackendError> {
        let url = format!("{}/api/ask", self.base_url);

        let request = AskRequest { question, top_k };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Query(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Query(body));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_request_uses_camel_case_top_k() {
        let request = AskRequest {
            question: "What is the leave policy?",
            top_k: 3,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["question"], "What is the leave policy?");
        assert_eq!(value["topK"], 3);
        assert!(value.get("top_k").is_none());
    }

    #[test]
    fn answer_requires_answer_field() {
        let ok: Answer = serde_json::from_str(r#"{"answer":"20 days","sources":[]}"#).unwrap();
        assert_eq!(ok.answer, "20 days");

        let missing = serde_json::from_str::<Answer>(r#"{"sources":[]}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn receipt_requires_filename_field() {
        let ok: UploadReceipt = serde_json::from_str(r#"{"filename":"policy.pdf"}"#).unwrap();
        assert_eq!(ok.filename, "policy.pdf");

        assert!(serde_json::from_str::<UploadReceipt>("{}").is_err());
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = BackendClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn errors_pass_backend_text_through() {
        assert_eq!(BackendError::Upload("too large".to_string()).to_string(), "too large");
        assert_eq!(BackendError::Query("timeout".to_string()).to_string(), "timeout");
    }
}
