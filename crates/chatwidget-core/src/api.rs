use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Body of a `POST /chat` answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
    pub responses: Option<Value>,
}

impl ChatReply {
    pub fn from_body(body: &Value) -> Self {
        Self {
            responses: body.get("responses").cloned(),
        }
    }

    /// Text to show for this reply, or `None` when there is nothing to render.
    ///
    /// Absent, `null`, `false`, `0` and `""` all count as nothing.
    pub fn text(&self) -> Option<String> {
        match self.responses.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            value => Some(value_text(value)),
        }
    }
}

/// Body of a `GET /scheduler/results` answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerResults {
    pub results: Option<Value>,
}

impl SchedulerResults {
    pub fn from_body(body: &Value) -> Self {
        Self {
            results: body.get("results").cloned(),
        }
    }

    /// Entries to render, in order. Empty unless `results` is a non-empty array.
    pub fn entries(&self) -> Vec<String> {
        match &self.results {
            Some(Value::Array(items)) => items.iter().map(value_text).collect(),
            _ => Vec::new(),
        }
    }
}

/// Strings verbatim, everything else as compact JSON
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// HTTP client for the chat server
#[derive(Clone)]
pub struct ChatApi {
    client: Client,
    base_url: String,
}

impl ChatApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send_chat(&self, message: &str) -> Result<ChatReply, ApiError> {
        let url = format!("{}/chat", self.base_url);

        let request = self.client.post(&url).json(&ChatRequest { message });
        let body = self.read_json(&url, request).await?;
        Ok(ChatReply::from_body(&body))
    }

    pub async fn fetch_results(&self) -> Result<SchedulerResults, ApiError> {
        let url = format!("{}/scheduler/results", self.base_url);

        let request = self.client.get(&url);
        let body = self.read_json(&url, request).await?;
        Ok(SchedulerResults::from_body(&body))
    }

    async fn read_json(&self, url: &str, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let transport = |source| ApiError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let text = response.text().await.map_err(transport)?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
