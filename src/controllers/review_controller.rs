use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

use crate::models::review::{CreateReviewResponse, NewReview, ReviewRequest};
use crate::state::AppState;

// Submit a review: generate the AI triple, then persist the complete record.
#[post("/api/reviews")]
pub async fn create_review(
    state: web::Data<AppState>,
    data: web::Json<ReviewRequest>,
) -> HttpResponse {
    let (rating, text) = match data.coerce() {
        Ok(fields) => fields,
        Err(e) => return server_error(&e),
    };

    let ai = state.generator.generate(rating, text.as_deref()).await;
    let ai_response = ai.user_response.clone();

    let review = match NewReview::new(rating, text, ai) {
        Ok(review) => review,
        Err(e) => return server_error(&e),
    };

    match state.store.insert(review).await {
        Ok(saved) => {
            log::info!("Stored review {} (rating {})", saved.id, saved.rating);
            HttpResponse::Created().json(CreateReviewResponse { ai_response })
        }
        Err(e) => server_error(&e),
    }
}

#[get("/api/reviews")]
pub async fn list_reviews(state: web::Data<AppState>) -> HttpResponse {
    match state.store.list_newest_first().await {
        Ok(reviews) => HttpResponse::Ok().json(reviews),
        Err(e) => {
            log::error!("Failed to fetch reviews: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Server error" }))
        }
    }
}

fn server_error<E: std::error::Error>(e: &E) -> HttpResponse {
    log::error!("Failed to create review: {:?}", e);
    HttpResponse::InternalServerError().json(json!({
        "error": e.to_string(),
        "details": format!("{:?}", e)
    }))
}

pub fn scope() -> actix_web::Scope {
    web::scope("").service(create_review).service(list_reviews)
}
