//! Mock OpenShift broker for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the broker
//! REST API for integration and end-to-end testing. Unlike wiremock which
//! mocks at the HTTP level per-test, this server maintains state across
//! requests and answers with real links, so a client can walk the whole
//! API the way it would against a broker.
//!
//! # Example
//!
//! ```ignore
//! use openshift_api::mock_server::MockServer;
//! use openshift_api::{Credentials, OpenShiftClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = OpenShiftClient::new(server.url(), Credentials::None).unwrap();
//!
//!     // Server comes with default fixtures
//!     let mut user = client.user().await.unwrap();
//!     let domain = user.domain_mut("foobar").await.unwrap().unwrap();
//!     assert!(domain.has_application("blog").await.unwrap());
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod render;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockApplication, MockDomain, MockState, HAPROXY, WEB_GROUP};
