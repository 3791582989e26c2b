//! reqwest-backed http collaborator.

use async_trait::async_trait;
use flowbot_core::HttpMethod;
use flowbot_engine::{ClientError, HttpClient, ResolvedHttpRequest};

/// Executes http states and decodes the response body as JSON.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        ReqwestHttpClient { client: reqwest::Client::new() }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(
        &self,
        request: &ResolvedHttpRequest,
    ) -> Result<serde_json::Value, ClientError> {
        let mut builder = self.client.request(method_of(request.method), &request.url);

        let query = query_pairs(request);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if !request.headers.content_type.is_empty() {
            builder = builder.header(reqwest::header::CONTENT_TYPE, &request.headers.content_type);
        }
        if !request.headers.accept.is_empty() {
            builder = builder.header(reqwest::header::ACCEPT, &request.headers.accept);
        }
        if !request.body_params.is_empty() {
            builder = builder.json(&body_map(request));
        }

        let response = builder.send().await.map_err(ClientError::call)?;
        response.json::<serde_json::Value>().await.map_err(ClientError::call)
    }
}

fn method_of(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Query parameters whose value resolved to blank are dropped from the
/// request instead of being sent empty.
fn query_pairs(request: &ResolvedHttpRequest) -> Vec<(&str, &str)> {
    request
        .query_params
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}

fn body_map(request: &ResolvedHttpRequest) -> serde_json::Map<String, serde_json::Value> {
    request
        .body_params
        .iter()
        .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
        .collect()
}
