// main.rs
use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

use feedbackloop::ai::{CompletionProvider, OpenRouterClient, ResponseGenerator};
use feedbackloop::config::AppConfig;
use feedbackloop::state::AppState;
use feedbackloop::store::MySqlReviewStore;
use feedbackloop::{db, server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting up...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match db::establish_connection(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to initialise database pool: {:?}", e);
            std::process::exit(1);
        }
    };

    let provider = match OpenRouterClient::from_config(&config.provider) {
        Ok(Some(client)) => {
            log::info!("AI responses enabled with model {}", client.model());
            Some(Arc::new(client) as Arc<dyn CompletionProvider>)
        }
        Ok(None) => {
            log::warn!("OPENROUTER_API_KEY not set; AI responses will use the fallback text");
            None
        }
        Err(e) => {
            log::error!("Failed to build AI client: {}", e);
            std::process::exit(1);
        }
    };

    let state = web::Data::new(AppState::new(
        Arc::new(MySqlReviewStore::new(pool)),
        ResponseGenerator::new(provider),
    ));
    let allowed_origins = config.allowed_origins.clone();

    log::info!("Server running on port {}", config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(server::cors(&allowed_origins))
            .wrap(Logger::default())
            .configure(server::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
