use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("completions provider transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completions provider refused request: {status}")]
    Status { status: u16, body: String },
    #[error("completions provider returned an error: {0}")]
    Api(String),
    #[error("completions provider returned no choices")]
    EmptyChoices,
    #[error("malformed completions payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// One chat-completion round trip returning the assistant message content.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete_json(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// OpenRouter-compatible chat completions client.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    /// Builds a client when a key is configured.
    pub fn from_config(config: &ProviderConfig) -> Result<Option<Self>, ProviderError> {
        match &config.api_key {
            Some(key) => Self::new(key.clone(), config).map(Some),
            None => Ok(None),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete_json(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        info!("Sending completion request with model: {}", self.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Referer", &self.referer)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Completions provider error: {} {}", status.as_u16(), body);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        if let Some(err) = parsed.error {
            return Err(ProviderError::Api(err.to_string()));
        }

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyChoices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::generator::{FallbackReason, Generation, ResponseGenerator};
    use crate::client::test_support::spawn_silent_listener;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    async fn serve(handler: fn(HttpRequest, web::Json<serde_json::Value>) -> HttpResponse) -> String {
        let server = HttpServer::new(move || {
            App::new().route(
                "/api/v1/chat/completions",
                web::post().to(move |req: HttpRequest, body: web::Json<serde_json::Value>| async move {
                    handler(req, body)
                }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}/api/v1", addr)
    }

    fn client_for(base_url: String) -> OpenRouterClient {
        client_with_timeout(base_url, Duration::from_secs(5))
    }

    fn client_with_timeout(base_url: String, timeout: Duration) -> OpenRouterClient {
        let config = ProviderConfig {
            api_key: Some("sk-test".into()),
            base_url,
            timeout,
            ..ProviderConfig::default()
        };
        OpenRouterClient::from_config(&config).unwrap().unwrap()
    }

    #[test]
    fn no_client_without_key() {
        assert!(OpenRouterClient::from_config(&ProviderConfig::default())
            .unwrap()
            .is_none());
    }

    #[actix_web::test]
    async fn sends_model_headers_and_json_format() {
        let base = serve(|req, body| {
            let auth = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let title = req
                .headers()
                .get("X-Title")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let ok = auth == "Bearer sk-test"
                && title == "FeedbackLoop AI"
                && body["model"] == "meta-llama/llama-3.1-8b-instruct"
                && body["response_format"]["type"] == "json_object"
                && body["messages"][0]["role"] == "user";
            let content = if ok { "{\"ok\":true}" } else { "{\"ok\":false}" };
            HttpResponse::Ok().json(json!({
                "choices": [{ "message": { "role": "assistant", "content": content } }]
            }))
        })
        .await;

        let content = client_for(base).complete_json("prompt").await.unwrap();
        assert_eq!(content, "{\"ok\":true}");
    }

    #[actix_web::test]
    async fn non_success_status_is_an_error() {
        let base = serve(|_, _| HttpResponse::Unauthorized().body("bad key")).await;
        let err = client_for(base).complete_json("prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 401, .. }));
    }

    #[actix_web::test]
    async fn error_member_in_body_is_an_error() {
        let base = serve(|_, _| {
            HttpResponse::Ok().json(json!({ "error": { "message": "quota" } }))
        })
        .await;
        let err = client_for(base).complete_json("prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::Api(_)));
    }

    #[actix_web::test]
    async fn non_json_body_is_an_error() {
        let base = serve(|_, _| HttpResponse::Ok().body("<html>oops</html>")).await;
        let err = client_for(base).complete_json("prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::Payload(_)));
    }

    #[actix_web::test]
    async fn empty_choices_is_an_error() {
        let base = serve(|_, _| HttpResponse::Ok().json(json!({ "choices": [] }))).await;
        let err = client_for(base).complete_json("prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyChoices));
    }

    #[tokio::test]
    async fn silent_provider_times_out_as_transport_error() {
        let base = format!("{}/api/v1", spawn_silent_listener().await);
        let client = client_with_timeout(base, Duration::from_millis(300));

        let started = Instant::now();
        let err = client.complete_json("prompt").await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(5));
        match err {
            ProviderError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected transport timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn silent_provider_yields_manual_review_triple() {
        let base = format!("{}/api/v1", spawn_silent_listener().await);
        let client = client_with_timeout(base, Duration::from_millis(300));
        let generator = ResponseGenerator::new(Some(Arc::new(client) as Arc<dyn CompletionProvider>));

        let outcome = generator.resolve(Some(2), Some("Page hangs")).await;
        assert!(matches!(
            outcome,
            Generation::Fallback(FallbackReason::Provider(ProviderError::Transport(_)))
        ));
        let feedback = outcome.into_feedback();
        assert_eq!(feedback.admin_summary, "AI processing failed");
        assert_eq!(feedback.admin_action, "Manual review required");
    }

    #[actix_web::test]
    async fn unreachable_provider_is_a_transport_error() {
        let err = client_for("http://127.0.0.1:9/api/v1".into())
            .complete_json("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
