use async_trait::async_trait;
use catalog_frontend::error::ClientError;
use catalog_frontend::models::book::FilterResponse;
use catalog_frontend::models::filter::FilterRequest;
use catalog_frontend::models::health::HealthStatus;
use catalog_frontend::services::api::{CatalogApi, RawResponse};
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

type Responder = Box<dyn Fn(&FilterRequest) -> (Duration, Result<Value, u16>) + Send + Sync>;

/// Scripted API that records every filter body it receives.
pub struct FakeApi {
    responder: Responder,
    health: Result<HealthStatus, u16>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new(
        responder: impl Fn(&FilterRequest) -> (Duration, Result<Value, u16>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            health: Err(503),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every filter request immediately with `body`.
    pub fn returning(body: Value) -> Self {
        Self::new(move |_| (Duration::ZERO, Ok(body.clone())))
    }

    pub fn failing(status: u16) -> Self {
        Self::new(move |_| (Duration::ZERO, Err(status)))
    }

    pub fn with_health(mut self, health: Result<HealthStatus, u16>) -> Self {
        self.health = health;
        self
    }

    pub fn recorded(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn status_error(url: &str, status: u16) -> ClientError {
    ClientError::Status {
        url: url.to_string(),
        status,
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn filter_books(&self, request: &FilterRequest) -> Result<FilterResponse, ClientError> {
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_string(request).unwrap());

        let (delay, outcome) = (self.responder)(request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let body = outcome.map_err(|status| status_error("fake://filter", status))?;
        serde_json::from_value(body).map_err(|source| ClientError::Decode {
            url: "fake://filter".to_string(),
            source,
        })
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.health
            .clone()
            .map_err(|status| status_error("fake://health", status))
    }

    async fn forward_filter(&self, body: Vec<u8>) -> Result<RawResponse, ClientError> {
        let request = match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(map)) if map.is_empty() => FilterRequest::All,
            Ok(value) => FilterRequest::Criteria(serde_json::from_value(value).unwrap_or_default()),
            Err(_) => {
                return Ok(RawResponse {
                    status: 422,
                    content_type: Some("text/plain".to_string()),
                    body: b"unprocessable".to_vec(),
                })
            }
        };

        self.requests
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(&body).into_owned());

        let (_, outcome) = (self.responder)(&request);
        Ok(match outcome {
            Ok(value) => RawResponse {
                status: 200,
                content_type: Some("application/json".to_string()),
                body: value.to_string().into_bytes(),
            },
            Err(status) => RawResponse {
                status,
                content_type: Some("application/json".to_string()),
                body: br#"{"detail":"upstream failure"}"#.to_vec(),
            },
        })
    }
}

pub fn books_body(names: &[&str]) -> Value {
    let books: Vec<Value> = names
        .iter()
        .map(|name| serde_json::json!({"book_name": name, "author": "Someone", "price": 5}))
        .collect();
    serde_json::json!({"book_info": {"total_books": books.len(), "books": books}})
}

pub fn card_count(html: &str) -> usize {
    html.matches(r#"class="book-card""#).count()
}
