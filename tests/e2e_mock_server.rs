//! E2E tests using the mock broker.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use std::time::Duration;

use openshift_api::mock_server::{Fixtures, MockDomain, MockServer, MockState, HAPROXY};
use openshift_api::{
    ApplicationScale, Cartridge, CartridgeSpec, CartridgeType, Credentials, Field, LatestVersionOf,
    NewApplication, OpenShiftClient, OpenShiftError, Refresh, Resource, Severity,
};

fn client_for(server: &MockServer) -> OpenShiftClient {
    OpenShiftClient::new(server.url(), Credentials::None).unwrap()
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/api", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Default Fixture Tests
// =============================================================================

#[tokio::test]
async fn test_default_fixtures_are_reachable_through_links() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let mut user = client.user().await.unwrap();
    assert_eq!(user.login(), "developer@example.com");
    assert_eq!(user.consumed_gears(), 1);

    let domain = user.domain_mut("foobar").await.unwrap().unwrap();
    let app = domain.application_mut("BLOG").await.unwrap().unwrap();
    assert_eq!(app.name(), "blog");
    assert_eq!(app.framework(), Some("php-5.4"));

    let standalone = app.cartridge().await.unwrap();
    assert_eq!(standalone.name(), "php-5.4");
    assert_eq!(standalone.cartridge_type(), CartridgeType::Standalone);

    let embedded = app.embedded_cartridges().await.unwrap();
    assert_eq!(embedded.len(), 1);
    assert_eq!(embedded[0].name(), "mysql-5.5");

    server.shutdown().await;
}

#[tokio::test]
async fn test_latest_version_from_catalog() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let catalog = client.cartridges().await.unwrap();

    let php = LatestVersionOf::php().find(&catalog).unwrap();
    assert_eq!(php.name, "php-5.4");

    let mysql = LatestVersionOf::mysql().find(&catalog).unwrap();
    assert_eq!(mysql.name, "mysql-5.5");

    assert!(LatestVersionOf::new("ruby").find(&catalog).is_none());

    server.shutdown().await;
}

// =============================================================================
// Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_full_application_lifecycle() {
    let server = MockServer::start_empty().await;
    let client = client_for(&server);

    let mut user = client.user().await.unwrap();
    assert!(user.domains().await.unwrap().is_empty());

    let domain = user.create_domain("acme").await.unwrap();
    assert_eq!(domain.id(), "acme");
    assert_eq!(domain.available_gear_profiles(), vec!["small", "medium"]);

    // Create an application with an embedded database
    let app = domain
        .create_application(
            NewApplication::new("shop")
                .cartridge(CartridgeSpec::named("php-5.4"))
                .embed(CartridgeSpec::named("mysql-5.5"))
                .gear_profile("medium"),
        )
        .await
        .unwrap();
    assert_eq!(app.gear_profile(), Some("medium"));
    assert!(app.messages().has_severity(Severity::Result));
    assert!(app.has_embedded_cartridge(&CartridgeSpec::named("mysql-5.5")).await.unwrap());

    // Running application answers, stopped one does not
    app.check_available(Duration::from_secs(5)).await.unwrap();
    app.stop(false).await.unwrap();
    let err = app.check_available(Duration::from_secs(5)).await.unwrap_err();
    assert!(matches!(err, OpenShiftError::ApplicationNotAvailable(_)));
    app.start().await.unwrap();
    app.check_available(Duration::from_secs(5)).await.unwrap();

    // Aliases
    app.add_alias("shop.example.com").await.unwrap();
    assert!(app.has_alias("shop.example.com"));
    app.remove_alias("shop.example.com").await.unwrap();
    assert!(app.aliases().is_empty());

    // Embed and remove a cartridge
    let cron = app
        .add_embeddable_cartridge(&CartridgeSpec::named("cron-1.4"))
        .await
        .unwrap();
    assert_eq!(cron.name(), "cron-1.4");
    assert_eq!(app.embedded_cartridges().await.unwrap().len(), 2);
    app.remove_embedded_cartridge("cron-1.4").await.unwrap();
    assert_eq!(app.embedded_cartridges().await.unwrap().len(), 1);

    // Single gear application: one group hosts everything
    let groups = app.gear_groups().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert!(groups[0].contains_cartridge("mysql-5.5"));

    app.set_additional_gear_storage("mysql-5.5", 4).await.unwrap();
    assert_eq!(app.additional_gear_storage("mysql-5.5").await.unwrap(), Some(4));
    assert_eq!(app.additional_gear_storage("php-5.4").await.unwrap(), Some(4));

    // Tear down
    domain.destroy_application("SHOP").await.unwrap();
    assert!(domain.applications().await.unwrap().is_empty());
    user.destroy_domain("acme", false).await.unwrap();
    assert!(!user.has_domain("acme").await.unwrap());

    server.shutdown().await;
}

#[tokio::test]
async fn test_scalable_application_gear_groups() {
    let server = MockServer::start_empty().await;
    let client = client_for(&server);

    let mut user = client.user().await.unwrap();
    let domain = user.create_domain("acme").await.unwrap();
    let app = domain
        .create_application(
            NewApplication::new("api")
                .cartridge(CartridgeSpec::named("jbossas-7"))
                .embed(CartridgeSpec::named("postgresql-9.2"))
                .scale(ApplicationScale::Scale),
        )
        .await
        .unwrap();
    assert!(app.scale().is_scalable());
    assert!(app.supports("SCALE_UP"));

    app.scale_up().await.unwrap();
    let groups = app.gear_groups().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].gears().len(), 2);
    assert!(groups[0].contains_cartridge(HAPROXY));

    // storage is per gear group
    app.set_additional_gear_storage("postgresql-9.2", 10).await.unwrap();
    assert_eq!(app.additional_gear_storage("postgresql-9.2").await.unwrap(), Some(10));
    assert_eq!(app.additional_gear_storage("jbossas-7").await.unwrap(), None);

    app.scale_down().await.unwrap();
    let err = app.scale_down().await.unwrap_err();
    assert_eq!(err.exit_code(), Some(168));

    server.shutdown().await;
}

#[tokio::test]
async fn test_single_gear_application_cannot_scale() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let mut user = client.user().await.unwrap();
    let app = user
        .domain_mut("foobar")
        .await
        .unwrap()
        .unwrap()
        .application_mut("blog")
        .await
        .unwrap()
        .unwrap();

    assert!(!app.supports("SCALE_UP"));
    let err = app.scale_up().await.unwrap_err();
    assert!(err.is_unsupported());

    server.shutdown().await;
}

// =============================================================================
// Broker Refusal Tests
// =============================================================================

#[tokio::test]
async fn test_domain_with_applications_needs_force() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let mut user = client.user().await.unwrap();
    let err = user.destroy_domain("foobar", false).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.exit_code(), Some(128));
    let messages = err.messages().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages.by_field(&Field::Default).len(), 1);
    assert!(user.has_domain("foobar").await.unwrap());

    user.destroy_domain("foobar", true).await.unwrap();
    assert!(!user.has_domain("foobar").await.unwrap());

    // gone on the server too
    let mut other = client_for(&server).user().await.unwrap();
    assert!(other.domains().await.unwrap().is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn test_duplicate_application_name_ignores_case() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let mut user = client.user().await.unwrap();
    let domain = user.domain_mut("foobar").await.unwrap().unwrap();
    let err = domain
        .create_application(NewApplication::new("Blog").cartridge(CartridgeSpec::named("php-5.4")))
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), Some(100));
    assert_eq!(domain.applications().await.unwrap().len(), 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_embedding_standalone_cartridge_is_refused() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let mut user = client.user().await.unwrap();
    let app = user
        .domain_mut("foobar")
        .await
        .unwrap()
        .unwrap()
        .application_mut("blog")
        .await
        .unwrap()
        .unwrap();

    let err = app
        .add_embeddable_cartridge(&CartridgeSpec::named("jbossas-7"))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), Some(109));

    let err = app
        .add_embeddable_cartridge(&CartridgeSpec::named("mysql-5.5"))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), Some(136));

    server.shutdown().await;
}

#[tokio::test]
async fn test_gear_quota_is_enforced() {
    let state = MockState::new()
        .with_max_gears(1)
        .with_domain(MockDomain::new("small"))
        .with_application("small", Fixtures::application("first", "php-5.4"))
        .with_cartridge(Fixtures::cartridge("php-5.4", CartridgeType::Standalone));
    let server = MockServer::with_state(state).await;
    let client = client_for(&server);

    let mut user = client.user().await.unwrap();
    let domain = user.domain_mut("small").await.unwrap().unwrap();
    let err = domain
        .create_application(NewApplication::new("second").cartridge(CartridgeSpec::named("php-5.4")))
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), Some(104));

    server.shutdown().await;
}

#[tokio::test]
async fn test_rename_domain() {
    let server = MockServer::start_empty().await;
    let client = client_for(&server);

    let mut user = client.user().await.unwrap();
    let domain = user.create_domain("before").await.unwrap();
    domain.rename("after").await.unwrap();
    assert_eq!(domain.id(), "after");

    let mut other = client_for(&server).user().await.unwrap();
    assert!(other.has_domain("after").await.unwrap());
    assert!(!other.has_domain("before").await.unwrap());

    server.shutdown().await;
}

// =============================================================================
// Concurrent Client Tests
// =============================================================================

#[tokio::test]
async fn test_refresh_sees_application_deleted_by_other_client() {
    let server = MockServer::start().await;

    let mut first = client_for(&server).user().await.unwrap();
    let mut second = client_for(&server).user().await.unwrap();

    let second_domain = second.domain_mut("foobar").await.unwrap().unwrap();
    assert!(second_domain.has_application("blog").await.unwrap());

    first
        .domain_mut("foobar")
        .await
        .unwrap()
        .unwrap()
        .destroy_application("blog")
        .await
        .unwrap();

    // the stale application no longer exists on the server
    let stale = second_domain.application_mut("blog").await.unwrap().unwrap();
    let err = stale.refresh().await.unwrap_err();
    assert!(matches!(err, OpenShiftError::NotFound { entity_type: "application", .. }));

    second_domain.refresh().await.unwrap();
    assert!(!second_domain.has_application("blog").await.unwrap());

    server.shutdown().await;
}

#[tokio::test]
async fn test_user_refresh_reloads_domains() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let mut user = client.user().await.unwrap();
    assert_eq!(user.domains().await.unwrap().len(), 1);

    server.state().write().await.domains.push(MockDomain::new("added"));

    user.refresh().await.unwrap();
    assert!(user.has_domain("added").await.unwrap());

    server.shutdown().await;
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[tokio::test]
async fn test_token_is_required_when_configured() {
    let state = MockState::new().with_required_token("secret");
    let server = MockServer::with_state(state).await;

    let anonymous = client_for(&server);
    let err = anonymous.user().await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let authorized = OpenShiftClient::new(server.url(), Credentials::token("secret")).unwrap();
    let user = authorized.user().await.unwrap();
    assert_eq!(user.login(), "developer@example.com");

    server.shutdown().await;
}
