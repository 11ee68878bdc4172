//! Resource tests against a wiremock broker.
//!
//! Each test mounts the API root and the responses it needs, then drives
//! the client through the links those responses carry.

use std::time::Duration;

use openshift_api::{
    Cartridge, CartridgeSpec, Credentials, Field, NewApplication, OpenShiftClient, OpenShiftError,
    Refresh, Resource, Severity,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(data_type: &str, data: Value) -> Value {
    json!({
        "type": data_type,
        "status": "ok",
        "version": "1.6",
        "data": data,
        "messages": []
    })
}

fn error_envelope(status: &str, exit_code: i32, text: &str) -> Value {
    json!({
        "type": null,
        "status": status,
        "data": null,
        "messages": [{"severity": "error", "exit_code": exit_code, "text": text, "field": null}]
    })
}

fn link(method: &str, href: String) -> Value {
    json!({"rel": "", "method": method, "href": href, "required_params": [], "optional_params": []})
}

async fn mount_api(server: &MockServer) {
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "links",
            json!({
                "GET_USER": link("GET", format!("{base}/user")),
                "LIST_DOMAINS": link("GET", format!("{base}/domains")),
                "ADD_DOMAIN": {
                    "method": "POST",
                    "href": format!("{base}/domains"),
                    "required_params": [{"name": "name", "type": "string", "valid_options": []}],
                    "optional_params": []
                },
                "LIST_CARTRIDGES": link("GET", format!("{base}/cartridges"))
            }),
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "user",
            json!({"login": "dev@example.com", "consumed_gears": 1, "max_gears": 3, "links": {}}),
        )))
        .mount(server)
        .await;
}

fn domain_json(base: &str, id: &str, with_delete: bool) -> Value {
    let mut links = json!({
        "GET": link("GET", format!("{base}/domain/{id}")),
        "LIST_APPLICATIONS": link("GET", format!("{base}/domain/{id}/applications")),
        "ADD_APPLICATION": {
            "method": "POST",
            "href": format!("{base}/domain/{id}/applications"),
            "required_params": [{"name": "name", "type": "string", "valid_options": []}],
            "optional_params": [
                {"name": "gear_size", "type": "string", "valid_options": ["small", "medium"]},
                {"name": "scale", "type": "boolean", "valid_options": [true, false]}
            ]
        }
    });
    if with_delete {
        links["DELETE"] = link("DELETE", format!("{base}/domain/{id}"));
    }
    json!({"id": id, "suffix": "rhcloud.com", "links": links})
}

fn application_json(base: &str, domain: &str, name: &str) -> Value {
    let href = format!("{base}/domain/{domain}/application/{name}");
    json!({
        "name": name,
        "id": format!("uuid-{name}"),
        "domain_id": domain,
        "framework": "php-5.4",
        "app_url": format!("http://{name}-{domain}.rhcloud.com/"),
        "scalable": false,
        "links": {
            "GET": link("GET", href.clone()),
            "DELETE": link("DELETE", href.clone()),
            "LIST_CARTRIDGES": link("GET", format!("{href}/cartridges")),
            "GET_GEAR_GROUPS": link("GET", format!("{href}/gear_groups"))
        }
    })
}

async fn mount_domains(server: &MockServer, domains: Value) {
    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("domains", domains)))
        .mount(server)
        .await;
}

async fn client_for(server: &MockServer) -> OpenShiftClient {
    mount_api(server).await;
    OpenShiftClient::new(&server.uri(), Credentials::token("test-token")).unwrap()
}

#[tokio::test]
async fn test_user_is_fetched_through_api_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "links",
            json!({"GET_USER": link("GET", format!("{}/user", server.uri()))}),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "user",
            json!({"login": "dev@example.com", "consumed_gears": 1, "max_gears": 3}),
        )))
        .expect(2)
        .mount(&server)
        .await;

    let client = OpenShiftClient::new(&server.uri(), Credentials::token("test-token")).unwrap();
    let user = client.user().await.unwrap();
    assert_eq!(user.login(), "dev@example.com");
    assert_eq!(user.max_gears(), 3);

    // the API root is fetched once per client
    let _ = client.user().await.unwrap();
}

#[tokio::test]
async fn test_missing_link_is_unsupported_without_request() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    mount_domains(&server, json!([domain_json(&server.uri(), "foobar", false)])).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut user = client.user().await.unwrap();
    let domain = user.domain("foobar").await.unwrap().unwrap();
    assert!(!domain.supports("DELETE"));

    let err = domain.destroy(false).await.unwrap_err();
    assert!(err.is_unsupported());
    assert!(matches!(
        err,
        OpenShiftError::UnsupportedOperation { resource: "domain", ref operation } if operation == "DELETE"
    ));
}

#[tokio::test]
async fn test_domain_destroy_refused_with_exit_code() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    mount_domains(&server, json!([domain_json(&server.uri(), "foobar", true)])).await;

    Mock::given(method("DELETE"))
        .and(path("/domain/foobar"))
        .respond_with(ResponseTemplate::new(422).set_body_json(error_envelope(
            "unprocessable_entity",
            128,
            "Domain contains applications. Delete applications first or set force to true.",
        )))
        .mount(&server)
        .await;

    let mut user = client.user().await.unwrap();
    let err = user.destroy_domain("foobar", false).await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.exit_code(), Some(128));
    let messages = err.messages().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages.by_field(&Field::Default).len(), 1);
    assert!(messages.has_severity(Severity::Error));
    assert!(err.to_string().contains("Domain contains applications"));

    // the domain stays listed after a refused destroy
    assert!(user.has_domain("foobar").await.unwrap());
}

#[tokio::test]
async fn test_forced_destroy_sends_force_and_drops_domain() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    mount_domains(&server, json!([domain_json(&server.uri(), "foobar", true)])).await;

    Mock::given(method("DELETE"))
        .and(path("/domain/foobar"))
        .and(query_param("force", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": null,
            "messages": [{"severity": "info", "text": "Domain foobar deleted.", "exit_code": 0}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut user = client.user().await.unwrap();
    let messages = user.destroy_domain("foobar", true).await.unwrap();

    assert_eq!(messages.len(), 1);
    assert!(!user.has_domain("foobar").await.unwrap());
}

#[tokio::test]
async fn test_duplicate_application_name_is_endpoint_error() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let base = server.uri();
    mount_domains(&server, json!([domain_json(&base, "foobar", true)])).await;

    Mock::given(method("GET"))
        .and(path("/domain/foobar/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "applications",
            json!([application_json(&base, "foobar", "blog")]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/domain/foobar/applications"))
        .respond_with(ResponseTemplate::new(422).set_body_json(error_envelope(
            "unprocessable_entity",
            100,
            "The supplied application name 'BLOG' already exists",
        )))
        .mount(&server)
        .await;

    let mut user = client.user().await.unwrap();
    let domain = user.domain_mut("foobar").await.unwrap().unwrap();
    let err = domain
        .create_application(NewApplication::new("BLOG").cartridge(CartridgeSpec::named("php-5.4")))
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), Some(100));
    assert_eq!(domain.applications().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_gear_profile_fails_before_request() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let base = server.uri();
    mount_domains(&server, json!([domain_json(&base, "foobar", true)])).await;

    Mock::given(method("GET"))
        .and(path("/domain/foobar/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("applications", json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut user = client.user().await.unwrap();
    let domain = user.domain_mut("foobar").await.unwrap().unwrap();
    assert_eq!(domain.available_gear_profiles(), vec!["small", "medium"]);

    let err = domain
        .create_application(
            NewApplication::new("blog")
                .cartridge(CartridgeSpec::named("php-5.4"))
                .gear_profile("huge"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, OpenShiftError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_refresh_drops_application_deleted_elsewhere() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let base = server.uri();
    mount_domains(&server, json!([domain_json(&base, "foobar", true)])).await;

    Mock::given(method("GET"))
        .and(path("/domain/foobar"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope("domain", domain_json(&base, "foobar", true))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domain/foobar/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "applications",
            json!([application_json(&base, "foobar", "blog")]),
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domain/foobar/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("applications", json!([]))))
        .mount(&server)
        .await;

    let mut user = client.user().await.unwrap();
    let domain = user.domain_mut("foobar").await.unwrap().unwrap();
    assert!(domain.has_application("blog").await.unwrap());

    domain.refresh().await.unwrap();
    assert!(!domain.has_application("blog").await.unwrap());
}

#[tokio::test]
async fn test_malformed_application_url_is_not_available() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let base = server.uri();
    mount_domains(&server, json!([domain_json(&base, "foobar", true)])).await;

    let mut blog = application_json(&base, "foobar", "blog");
    blog["app_url"] = json!("not a url");
    Mock::given(method("GET"))
        .and(path("/domain/foobar/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("applications", json!([blog]))))
        .mount(&server)
        .await;

    let mut user = client.user().await.unwrap();
    let domain = user.domain_mut("foobar").await.unwrap().unwrap();
    let app = domain.application("blog").await.unwrap().unwrap();

    let err = app.check_available(Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, OpenShiftError::ApplicationNotAvailable(ref m) if m.contains("not a url")));
}

#[tokio::test]
async fn test_refresh_of_deleted_application_is_not_found() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let base = server.uri();
    mount_domains(&server, json!([domain_json(&base, "foobar", true)])).await;

    Mock::given(method("GET"))
        .and(path("/domain/foobar/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "applications",
            json!([application_json(&base, "foobar", "blog")]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domain/foobar/application/blog"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_envelope(
            "not_found",
            101,
            "Application 'blog' not found.",
        )))
        .mount(&server)
        .await;

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

    let err = app.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        OpenShiftError::NotFound { entity_type: "application", ref id } if id == "blog"
    ));
}

#[tokio::test]
async fn test_slow_application_create_times_out() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let base = server.uri();
    mount_domains(&server, json!([domain_json(&base, "foobar", true)])).await;

    Mock::given(method("GET"))
        .and(path("/domain/foobar/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("applications", json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/domain/foobar/applications"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(envelope("application", application_json(&base, "foobar", "blog")))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut user = client.user().await.unwrap();
    let domain = user.domain_mut("foobar").await.unwrap().unwrap();
    let err = domain
        .create_application(
            NewApplication::new("blog")
                .cartridge(CartridgeSpec::named("php-5.4"))
                .timeout(Duration::from_millis(200)),
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(domain.applications().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_additional_gear_storage_sends_size() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let base = server.uri();
    mount_domains(&server, json!([domain_json(&base, "foobar", true)])).await;

    let app_href = format!("{base}/domain/foobar/application/blog");
    let cartridge = |storage: Option<u32>| {
        json!({
            "name": "mysql-5.5",
            "type": "embedded",
            "additional_gear_storage": storage,
            "links": {
                "GET": link("GET", format!("{app_href}/cartridge/mysql-5.5")),
                "UPDATE": {
                    "method": "PUT",
                    "href": format!("{app_href}/cartridge/mysql-5.5"),
                    "required_params": [],
                    "optional_params": [{"name": "additional_gear_storage", "type": "integer"}]
                }
            }
        })
    };

    Mock::given(method("GET"))
        .and(path("/domain/foobar/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "applications",
            json!([application_json(&base, "foobar", "blog")]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domain/foobar/application/blog/cartridges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "cartridges",
            json!([
                {"name": "php-5.4", "type": "standalone", "links": {}},
                cartridge(None)
            ]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/domain/foobar/application/blog/cartridge/mysql-5.5"))
        .and(body_json(json!({"additional_gear_storage": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("cartridge", cartridge(Some(5)))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domain/foobar/application/blog/gear_groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "gear_groups",
            json!([{
                "id": "gg1",
                "name": "web",
                "additional_gear_storage": 5,
                "gears": [{"id": "g1", "state": "started"}],
                "cartridges": [{"name": "php-5.4"}, {"name": "mysql-5.5"}]
            }]),
        )))
        .mount(&server)
        .await;

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

    app.set_additional_gear_storage("mysql-5.5", 5).await.unwrap();
    assert_eq!(app.additional_gear_storage("mysql-5.5").await.unwrap(), Some(5));

    let err = app.set_additional_gear_storage("cron-1.4", 1).await.unwrap_err();
    assert!(matches!(err, OpenShiftError::NotFound { .. }));
}

#[tokio::test]
async fn test_standalone_cartridge_cannot_be_removed() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let base = server.uri();
    mount_domains(&server, json!([domain_json(&base, "foobar", true)])).await;

    Mock::given(method("GET"))
        .and(path("/domain/foobar/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "applications",
            json!([application_json(&base, "foobar", "blog")]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domain/foobar/application/blog/cartridges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "cartridges",
            json!([{"name": "php-5.4", "type": "standalone", "links": {}}]),
        )))
        .mount(&server)
        .await;

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

    assert_eq!(app.cartridge().await.unwrap().name(), "php-5.4");
    let err = app.remove_embedded_cartridge("php-5.4").await.unwrap_err();
    assert!(matches!(err, OpenShiftError::NotFound { .. }));

    let standalone = app.cartridge().await.unwrap();
    let err = standalone.set_additional_gear_storage(1).await.unwrap_err();
    assert!(err.is_unsupported());
}
