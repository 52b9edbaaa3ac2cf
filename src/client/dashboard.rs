use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::api::{ApiClientError, ReviewsApi};
use crate::models::review::{Review, MAX_RATING, MIN_RATING};

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(15);

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load reviews. Backend might be unavailable.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatingFilter {
    #[default]
    All,
    Exactly(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::NewestFirst => SortOrder::OldestFirst,
            SortOrder::OldestFirst => SortOrder::NewestFirst,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RatingCount {
    pub stars: i32,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total: usize,
    /// Mean rating rounded to one decimal place.
    pub average: Decimal,
    /// Count per rating value; only values that occur are present.
    pub distribution: BTreeMap<i32, i64>,
}

impl DashboardMetrics {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let total = reviews.len();
        if total == 0 {
            return Self {
                total,
                average: Decimal::ZERO,
                distribution: BTreeMap::new(),
            };
        }

        let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
        let average = (Decimal::from(sum) / Decimal::from(total as i64))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

        let mut distribution = BTreeMap::new();
        for review in reviews {
            *distribution.entry(review.rating).or_insert(0) += 1;
        }

        Self {
            total,
            average,
            distribution,
        }
    }

    /// Average formatted with exactly one decimal, e.g. `4.0`.
    pub fn average_label(&self) -> String {
        format!("{:.1}", self.average)
    }

    /// Per-star rows from 5 down to 1, including stars nobody gave.
    pub fn breakdown(&self) -> Vec<RatingCount> {
        (MIN_RATING..=MAX_RATING)
            .rev()
            .map(|stars| {
                let count = self.distribution.get(&stars).copied().unwrap_or(0);
                let percentage = if self.total > 0 {
                    (count as f64 / self.total as f64) * 100.0
                } else {
                    0.0
                };
                RatingCount {
                    stars,
                    count,
                    percentage,
                }
            })
            .collect()
    }
}

/// Colour band of a row's star marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn of(rating: i32) -> Self {
        match rating {
            r if r >= 4 => Sentiment::Positive,
            r if r <= 2 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

/// What an expanded row reveals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDetails<'a> {
    pub full_text: &'a str,
    pub ai_response: Option<&'a str>,
    pub ai_summary: Option<&'a str>,
    pub ai_action: Option<&'a str>,
}

/// Admin view model: the last good list plus local filter, sort and expand state.
#[derive(Debug, Default)]
pub struct Dashboard {
    reviews: Vec<Review>,
    loading: bool,
    error: Option<String>,
    last_refreshed: Option<DateTime<Utc>>,
    filter: RatingFilter,
    sort: SortOrder,
    expanded: HashSet<String>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    /// Applies a fetch result. A failure keeps the previously loaded list.
    pub fn apply(&mut self, result: Result<Vec<Review>, ApiClientError>) {
        match result {
            Ok(reviews) => {
                self.reviews = reviews;
                self.error = None;
                self.last_refreshed = Some(Utc::now());
            }
            Err(e) => {
                log::error!("Failed to fetch reviews: {}", e);
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
            }
        }
        self.loading = false;
    }

    pub async fn refresh(&mut self, api: &ReviewsApi) {
        let result = api.fetch_reviews().await;
        self.apply(result);
    }

    pub fn metrics(&self) -> DashboardMetrics {
        DashboardMetrics::from_reviews(&self.reviews)
    }

    pub fn filter(&self) -> RatingFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: RatingFilter) {
        self.filter = filter;
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    /// Loaded reviews after filtering and sorting by creation time.
    pub fn visible(&self) -> Vec<&Review> {
        let mut rows: Vec<&Review> = self
            .reviews
            .iter()
            .filter(|r| match self.filter {
                RatingFilter::All => true,
                RatingFilter::Exactly(k) => r.rating == k,
            })
            .collect();

        match self.sort {
            SortOrder::NewestFirst => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::OldestFirst => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
        rows
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Details for `review` when its row is expanded, `None` when collapsed.
    pub fn details<'a>(&self, review: &'a Review) -> Option<RowDetails<'a>> {
        if !self.is_expanded(&review.id) {
            return None;
        }
        Some(RowDetails {
            full_text: &review.text,
            ai_response: review.ai_response.as_deref(),
            ai_summary: review.ai_summary.as_deref(),
            ai_action: review.ai_action.as_deref(),
        })
    }
}

/// Shared handle used by the periodic refresh task and the UI.
pub type SharedDashboard = Arc<Mutex<Dashboard>>;

/// Manual refresh of a shared dashboard. The lock is taken only to apply the
/// result, so readers keep seeing the last good list while the fetch runs.
pub async fn refresh_shared(api: &ReviewsApi, dashboard: &SharedDashboard) {
    let result = api.fetch_reviews().await;
    dashboard.lock().await.apply(result);
}

/// Fetches immediately, then every `period`, until the handle is aborted.
pub fn spawn_refresh_loop(
    api: ReviewsApi,
    dashboard: SharedDashboard,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            refresh_shared(&api, &dashboard).await;
        }
    })
}
