//! Client-side counterparts of the web front end: a typed API client, the
//! submission form state machine and the admin dashboard view model.

pub mod api;
pub mod dashboard;
pub mod form;

pub use api::{ApiClientError, ReviewsApi};
pub use dashboard::{Dashboard, DashboardMetrics, RatingFilter, RowDetails, Sentiment, SortOrder};
pub use form::{FormError, SubmissionForm, SubmitStatus};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use actix_web::{web, App, HttpServer};

    use crate::ai::{CompletionProvider, ResponseGenerator};
    use crate::server::configure;
    use crate::state::AppState;
    use crate::store::ReviewStore;

    /// Runs the real review routes on an ephemeral port and returns the base URL.
    pub(crate) fn spawn_server(
        store: Arc<dyn ReviewStore>,
        provider: Option<Arc<dyn CompletionProvider>>,
    ) -> String {
        let state = web::Data::new(AppState::new(store, ResponseGenerator::new(provider)));
        let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("bind test server");
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    /// Accepts connections and holds them open without ever replying.
    pub(crate) async fn spawn_silent_listener() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind silent listener");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    /// A base URL nothing listens on.
    pub(crate) const DEAD_URL: &str = "http://127.0.0.1:9";
}
