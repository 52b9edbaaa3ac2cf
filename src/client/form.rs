use crate::client::api::ReviewsApi;
use crate::models::review::{MAX_RATING, MIN_RATING};

/// Characters accepted in the review text box.
pub const MAX_TEXT_CHARS: usize = 1500;

pub const SUBMIT_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please select a star rating.")]
    MissingRating,
    #[error("Please write a review.")]
    MissingText,
}

/// State of the review submission form.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    rating: u8,
    text: String,
    status: SubmitStatus,
    error: Option<String>,
    response: Option<String>,
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0 means no star selected.
    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Selects a star; values outside 1..=5 are ignored.
    pub fn set_rating(&mut self, stars: u8) {
        if (MIN_RATING..=MAX_RATING).contains(&i32::from(stars)) {
            self.rating = stars;
        }
    }

    pub fn clear_rating(&mut self) {
        self.rating = 0;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text, keeping only the first `MAX_TEXT_CHARS` characters.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().take(MAX_TEXT_CHARS).collect();
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn near_limit(&self) -> bool {
        self.char_count() * 10 > MAX_TEXT_CHARS * 9
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.rating == 0 {
            return Err(FormError::MissingRating);
        }
        if self.text.trim().is_empty() {
            return Err(FormError::MissingText);
        }
        Ok(())
    }

    /// Validates locally, then posts. Fields are cleared only on success.
    pub async fn submit(&mut self, api: &ReviewsApi) -> SubmitStatus {
        if let Err(e) = self.validate() {
            self.error = Some(e.to_string());
            return self.status;
        }

        self.status = SubmitStatus::Submitting;
        self.error = None;
        self.response = None;

        match api.submit(i32::from(self.rating), &self.text).await {
            Ok(created) => {
                self.status = SubmitStatus::Success;
                self.response = Some(created.ai_response);
                self.rating = 0;
                self.text.clear();
            }
            Err(e) => {
                log::error!("Review submission failed: {}", e);
                self.status = SubmitStatus::Error;
                self.error = Some(SUBMIT_FAILED_MESSAGE.to_string());
            }
        }

        self.status
    }
}
