// src/models/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// One stored submission together with the AI-derived fields resolved at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub rating: i32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_action: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/reviews`. Fields are kept as raw JSON so that a missing or
/// mistyped value reaches the handler and fails through the record schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
}

impl ReviewRequest {
    pub fn new(rating: i32, text: &str) -> Self {
        Self {
            rating: Some(Value::from(rating)),
            text: Some(Value::from(text)),
        }
    }

    /// Casts both fields to their schema types. `null` counts as absent.
    pub fn coerce(&self) -> Result<(Option<i32>, Option<String>), ReviewValidationError> {
        Ok((cast_rating(self.rating.as_ref())?, cast_text(self.text.as_ref())?))
    }
}

/// Integral numbers, numeric strings and booleans are accepted as ratings.
fn cast_rating(value: Option<&Value>) -> Result<Option<i32>, ReviewValidationError> {
    let invalid = |v: &Value| ReviewValidationError::InvalidRating(v.to_string());

    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    let number = match value {
        Value::Number(n) => n.as_i64().map(|i| i as f64).or_else(|| n.as_f64()),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
    .ok_or_else(|| invalid(value))?;

    if number.fract() != 0.0 || number < f64::from(i32::MIN) || number > f64::from(i32::MAX) {
        return Err(invalid(value));
    }
    Ok(Some(number as i32))
}

fn cast_text(value: Option<&Value>) -> Result<Option<String>, ReviewValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ReviewValidationError::InvalidText(other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewResponse {
    pub ai_response: String,
}

/// The triple produced by the response generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiFeedback {
    pub user_response: String,
    pub admin_summary: String,
    pub admin_action: String,
}

impl AiFeedback {
    pub fn new(
        user_response: impl Into<String>,
        admin_summary: impl Into<String>,
        admin_action: impl Into<String>,
    ) -> Self {
        Self {
            user_response: user_response.into(),
            admin_summary: admin_summary.into(),
            admin_action: admin_action.into(),
        }
    }
}

/// A record ready to be inserted. Construction enforces the record schema:
/// a rating within bounds and a present text.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub rating: i32,
    pub text: String,
    pub ai_response: Option<String>,
    pub ai_summary: Option<String>,
    pub ai_action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("Review validation failed: rating: Path `rating` is required.")]
    MissingRating,
    #[error("Review validation failed: rating: Path `rating` ({0}) must be between 1 and 5.")]
    RatingOutOfRange(i32),
    #[error("Review validation failed: text: Path `text` is required.")]
    MissingText,
    #[error("Review validation failed: rating: Cast to Number failed for value {0} at path `rating`")]
    InvalidRating(String),
    #[error("Review validation failed: text: expected a string, got {0}")]
    InvalidText(String),
}

impl NewReview {
    pub fn new(
        rating: Option<i32>,
        text: Option<String>,
        ai: AiFeedback,
    ) -> Result<Self, ReviewValidationError> {
        let rating = rating.ok_or(ReviewValidationError::MissingRating)?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ReviewValidationError::RatingOutOfRange(rating));
        }
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return Err(ReviewValidationError::MissingText),
        };

        Ok(Self {
            rating,
            text,
            ai_response: Some(ai.user_response),
            ai_summary: Some(ai.admin_summary),
            ai_action: Some(ai.admin_action),
        })
    }

    pub fn into_review(self, id: String, created_at: DateTime<Utc>) -> Review {
        Review {
            id,
            rating: self.rating,
            text: self.text,
            ai_response: self.ai_response,
            ai_summary: self.ai_summary,
            ai_action: self.ai_action,
            created_at,
        }
    }
}
