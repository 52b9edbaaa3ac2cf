// src/store.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::review::{NewReview, Review};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence seam for reviews. Records are inserted once and never updated.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(&self, review: NewReview) -> Result<Review, StoreError>;

    /// Every stored review, newest `created_at` first.
    async fn list_newest_first(&self) -> Result<Vec<Review>, StoreError>;
}

pub struct MySqlReviewStore {
    pool: MySqlPool,
}

impl MySqlReviewStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for MySqlReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review, StoreError> {
        let record = review.into_review(Uuid::new_v4().to_string(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO reviews
            (id, rating, text, ai_response, ai_summary, ai_action, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(record.rating)
        .bind(&record.text)
        .bind(&record.ai_response)
        .bind(&record.ai_summary)
        .bind(&record.ai_action)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_newest_first(&self) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, rating, text, ai_response, ai_summary, ai_action, created_at
            FROM reviews
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}

/// Process-local store, used by tests and for running without a database.
#[derive(Default)]
pub struct MemoryReviewStore {
    reviews: Mutex<Vec<Review>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed record, keeping its timestamp.
    pub async fn insert_at(&self, review: NewReview, created_at: DateTime<Utc>) -> Review {
        let record = review.into_review(Uuid::new_v4().to_string(), created_at);
        self.reviews.lock().await.push(record.clone());
        record
    }

    pub async fn len(&self) -> usize {
        self.reviews.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reviews.lock().await.is_empty()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review, StoreError> {
        Ok(self.insert_at(review, Utc::now()).await)
    }

    async fn list_newest_first(&self) -> Result<Vec<Review>, StoreError> {
        let mut reviews = self.reviews.lock().await.clone();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}
