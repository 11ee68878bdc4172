//! Mock broker server.
//!
//! Provides an axum-based HTTP server that simulates the OpenShift broker.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock OpenShift broker for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation.
pub struct MockServer {
    /// The REST base URL of the server.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with an empty user and the default catalog.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        let mut state = MockState::new();
        state.catalog = Fixtures::default_catalog();
        Self::with_state(state).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(mut state: MockState) -> Self {
        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");
        let url = format!("http://{}/broker/rest", addr);

        state.base_url = url.clone();
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Server error");
        });

        Self {
            url,
            handle,
            state: shared_state,
        }
    }

    /// Get the REST base URL of the mock server.
    ///
    /// Use this URL when creating an `OpenShiftClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();
        state.domains = scenario.domains;
        state.catalog = scenario.catalog;
        state
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let broker = Router::new()
            .route("/api", get(handlers::get_api))
            .route("/user", get(handlers::get_user))
            .route("/cartridges", get(handlers::list_cartridges))
            // Domain routes
            .route(
                "/domains",
                get(handlers::list_domains).post(handlers::create_domain),
            )
            .route(
                "/domain/:id",
                get(handlers::get_domain)
                    .put(handlers::update_domain)
                    .delete(handlers::delete_domain),
            )
            // Application routes
            .route(
                "/domain/:id/applications",
                get(handlers::list_applications).post(handlers::create_application),
            )
            .route(
                "/domain/:id/application/:name",
                get(handlers::get_application).delete(handlers::delete_application),
            )
            .route(
                "/domain/:id/application/:name/events",
                axum::routing::post(handlers::application_event),
            )
            .route(
                "/domain/:id/application/:name/cartridges",
                get(handlers::list_application_cartridges).post(handlers::add_cartridge),
            )
            .route(
                "/domain/:id/application/:name/cartridge/:cartridge",
                get(handlers::get_cartridge)
                    .put(handlers::update_cartridge)
                    .delete(handlers::delete_cartridge),
            )
            .route(
                "/domain/:id/application/:name/gear_groups",
                get(handlers::list_gear_groups),
            )
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                handlers::require_token,
            ))
            // Deployed applications answer anonymously
            .route("/app/:id/:name/", get(handlers::probe_application));

        Router::new()
            .nest("/broker/rest", broker)
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
