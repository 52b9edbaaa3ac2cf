use std::time::Duration;

use reqwest::Client;

use crate::models::review::{CreateReviewResponse, Review, ReviewRequest};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
}

/// Typed client for `/api/reviews`.
#[derive(Clone)]
pub struct ReviewsApi {
    client: Client,
    base_url: String,
}

impl ReviewsApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiClientError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn reviews_url(&self) -> String {
        format!("{}/api/reviews", self.base_url)
    }

    pub async fn submit(&self, rating: i32, text: &str) -> Result<CreateReviewResponse, ApiClientError> {
        let body = ReviewRequest::new(rating, text);
        let response = self.client.post(self.reviews_url()).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(ApiClientError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    pub async fn fetch_reviews(&self) -> Result<Vec<Review>, ApiClientError> {
        let response = self.client.get(self.reviews_url()).send().await?;
        if !response.status().is_success() {
            return Err(ApiClientError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::generator::tests::{FakeProvider, GOOD_REPLY};
    use crate::ai::CompletionProvider;
    use crate::client::test_support::{spawn_server, DEAD_URL};
    use crate::store::MemoryReviewStore;
    use std::sync::Arc;

    #[actix_web::test]
    async fn submit_then_fetch_round_trip() {
        let provider: Arc<dyn CompletionProvider> = FakeProvider::replying(GOOD_REPLY);
        let base = spawn_server(Arc::new(MemoryReviewStore::new()), Some(provider));
        let api = ReviewsApi::new(base).unwrap();

        let created = api.submit(5, "Great!").await.unwrap();
        assert_eq!(created.ai_response, "Thanks!");

        let reviews = api.fetch_reviews().await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].ai_summary.as_deref(), Some("Positive."));
    }

    #[actix_web::test]
    async fn server_error_maps_to_status() {
        let base = spawn_server(Arc::new(MemoryReviewStore::new()), None);
        let api = ReviewsApi::new(base).unwrap();
        let err = api.submit(42, "x").await.unwrap_err();
        assert!(matches!(err, ApiClientError::Status(500)));
    }

    #[actix_web::test]
    async fn unreachable_server_is_a_transport_error() {
        let api = ReviewsApi::new(DEAD_URL).unwrap();
        assert!(matches!(
            api.fetch_reviews().await,
            Err(ApiClientError::Transport(_))
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let api = ReviewsApi::new("http://localhost:5000/").unwrap();
        assert_eq!(api.reviews_url(), "http://localhost:5000/api/reviews");
    }
}
