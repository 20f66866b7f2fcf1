//! OpenAI-compatible adapter for rooftop analysis.
//!
//! Targets OpenRouter by default; any chat-completions endpoint that accepts
//! `image_url` content parts works (OpenAI, Azure OpenAI, local gateways).

use crate::adapters::ai::prompt::rooftop_prompt;
use crate::domain::{ApiCredential, BudgetRange, DomainError, EncodedImage};
use crate::ports::AiPort;
use crate::shared::config::{DEFAULT_AI_MAX_TOKENS, DEFAULT_AI_TEMPERATURE};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Longest slice of an error body carried into `DomainError::Api`.
const ERROR_BODY_PREVIEW: usize = 200;
/// Longest slice of a malformed body shown back to the user.
const RAW_BODY_PREVIEW: usize = 2000;

/// OpenAI-compatible vision adapter.
///
/// The credential is supplied per call; the adapter itself holds no secret.
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `api_url` - Chat completions endpoint (e.g. "https://openrouter.ai/api/v1/chat/completions")
    /// * `model` - Vision-capable model name (e.g. "anthropic/claude-3.5-sonnet")
    pub fn new(api_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            model,
            max_tokens: DEFAULT_AI_MAX_TOKENS,
            temperature: DEFAULT_AI_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_request(&self, prompt: String, image: &EncodedImage) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_uri(),
                        },
                    },
                ],
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

fn preview(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Chat completions request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

/// Chat completions response structure.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait::async_trait]
impl AiPort for OpenAiAdapter {
    fn model(&self) -> &str {
        &self.model
    }

    async fn analyze_rooftop(
        &self,
        credential: &ApiCredential,
        location: &str,
        budget: &BudgetRange,
        image: &EncodedImage,
    ) -> Result<String, DomainError> {
        info!(
            model = %self.model,
            image_bytes = image.byte_len,
            width = image.width,
            height = image.height,
            "sending rooftop image to AI for analysis"
        );

        let request = self.build_request(rooftop_prompt(location, budget), image);

        let response = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", credential.expose()))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, body = %preview(&body, ERROR_BODY_PREVIEW), "AI API returned error");
            return Err(DomainError::Api {
                status: status.as_u16(),
                body: preview(&body, ERROR_BODY_PREVIEW),
            });
        }

        debug!(status = %status, body_len = body.len(), "received AI response");

        if body.trim().is_empty() {
            return Err(DomainError::MalformedResponse {
                reason: "empty response body".to_string(),
                raw: String::new(),
            });
        }

        let chat_response: ChatResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "AI API returned invalid JSON");
                return Err(DomainError::MalformedResponse {
                    reason: format!("invalid JSON: {}", e),
                    raw: preview(&body, RAW_BODY_PREVIEW),
                });
            }
        };

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty());

        match content {
            Some(text) => {
                info!(text_len = text.len(), "AI analysis complete");
                Ok(text)
            }
            None => {
                warn!("AI response carried no choices");
                Err(DomainError::MalformedResponse {
                    reason: "no response choices returned".to_string(),
                    raw: preview(&body, RAW_BODY_PREVIEW),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Spawn an in-process completion endpoint that records each request and
    /// answers with a fixed status and body.
    async fn spawn_endpoint(status: StatusCode, body: &'static str) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let app = axum::Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(payload): Json<Value>| {
                let recorder = Arc::clone(&recorder);
                async move {
                    let auth = headers
                        .get(AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    recorder.lock().unwrap().push((auth, payload));
                    (status, body)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/v1/chat/completions", addr), seen)
    }

    fn fixture() -> (ApiCredential, BudgetRange, EncodedImage) {
        (
            ApiCredential::new("sk-or-test").unwrap(),
            BudgetRange::new(10_000.0, 20_000.0).unwrap(),
            EncodedImage {
                media_type: "image/jpeg",
                base64: "/9j/AAAA".to_string(),
                width: 4,
                height: 3,
                byte_len: 6,
            },
        )
    }

    #[tokio::test]
    async fn test_single_call_with_bearer_prompt_and_image() {
        let (url, seen) = spawn_endpoint(
            StatusCode::OK,
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"roof_analysis\":{}}"}}]}"#,
        )
        .await;
        let adapter = OpenAiAdapter::new(url, "vision-model".to_string()).with_max_tokens(500);
        let (key, budget, image) = fixture();

        let text = adapter
            .analyze_rooftop(&key, "Austin, TX", &budget, &image)
            .await
            .unwrap();
        assert_eq!(text, r#"{"roof_analysis":{}}"#);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (auth, payload) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-or-test"));
        assert_eq!(payload["model"], "vision-model");
        assert_eq!(payload["max_tokens"], 500);
        let content = &payload["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        let prompt = content[0]["text"].as_str().unwrap();
        assert!(prompt.contains("Location: Austin, TX"));
        assert!(prompt.contains("Budget: $10,000.00 - $20,000.00"));
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/jpeg;base64,/9j/AAAA"
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let (url, seen) =
            spawn_endpoint(StatusCode::UNAUTHORIZED, r#"{"error":"bad key"}"#).await;
        let adapter = OpenAiAdapter::new(url, "m".to_string());
        let (key, budget, image) = fixture();

        let err = adapter
            .analyze_rooftop(&key, "Oslo", &budget, &image)
            .await
            .unwrap_err();
        match err {
            DomainError::Api { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("bad key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // no retry
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_envelope_without_choices_is_malformed() {
        let (url, _) = spawn_endpoint(StatusCode::OK, r#"{"id":"x","choices":[]}"#).await;
        let adapter = OpenAiAdapter::new(url, "m".to_string());
        let (key, budget, image) = fixture();

        let err = adapter
            .analyze_rooftop(&key, "Oslo", &budget, &image)
            .await
            .unwrap_err();
        match err {
            DomainError::MalformedResponse { raw, .. } => assert!(raw.contains("\"id\":\"x\"")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let (url, _) = spawn_endpoint(StatusCode::OK, "<html>gateway</html>").await;
        let adapter = OpenAiAdapter::new(url, "m".to_string());
        let (key, budget, image) = fixture();

        let err = adapter
            .analyze_rooftop(&key, "Oslo", &budget, &image)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MalformedResponse { ref raw, .. } if raw.contains("gateway")));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let adapter = OpenAiAdapter::new(format!("http://{}/v1", addr), "m".to_string());
        let (key, budget, image) = fixture();

        let err = adapter
            .analyze_rooftop(&key, "Oslo", &budget, &image)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Transport(_)));
    }
}
