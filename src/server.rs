// src/server.rs
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web::{self, JsonConfig};

use crate::controllers;

const JSON_LIMIT: usize = 100 * 1024;

/// Accepts only the configured origins; any other origin is refused before the
/// route runs. Requests without an `Origin` header pass.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let allowed = allowed_origins.to_vec();

    Cors::default()
        .allowed_origin_fn(move |origin, _req_head| {
            let origin = origin.to_str().unwrap_or_default();
            let ok = allowed.iter().any(|o| o == origin);
            if !ok {
                log::warn!("Blocked by CORS: {}", origin);
            }
            ok
        })
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .block_on_origin_mismatch(true)
        .max_age(3600)
}

pub fn json_config() -> JsonConfig {
    JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            log::error!("JSON payload error: {}", err);
            actix_web::error::ErrorBadRequest(format!("Payload error: {}", err))
        })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(controllers::review_controller::scope());
}
