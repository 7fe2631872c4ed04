#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ils_connector::{Connector, ConnectorConfig, LogLevel};

pub const TOKEN_PATH: &str = "/api/v1/oauth/token";
pub const PATRONS_PATH: &str = "/api/v1/patrons";
pub const CATEGORIES_PATH: &str = "/api/v1/patron_categories";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub async fn setup_mock_server() -> MockServer {
    init_logging();
    MockServer::start().await
}

pub fn config(base_url: &str) -> ConnectorConfig {
    ConnectorConfig::new(base_url, "none").with_log_level(LogLevel::Debug)
}

pub fn connector(server: &MockServer) -> Connector {
    Connector::new(config(&server.uri())).expect("valid configuration")
}

pub fn oauth_connector(server: &MockServer) -> Connector {
    let config = config(&server.uri()).with_client_credentials("connector", "s3cret");
    Connector::new(config).expect("valid configuration")
}

pub fn token_response(token: &str, expires_in: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": expires_in
    }))
}

/// Token endpoint answering every grant with `token`, expected `calls` times.
pub async fn mount_token_endpoint(server: &MockServer, token: &str, expires_in: u64, calls: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=connector"))
        .and(body_string_contains("client_secret=s3cret"))
        .respond_with(token_response(token, expires_in))
        .expect(calls)
        .mount(server)
        .await;
}

pub fn patron(id: u64, userid: &str) -> Value {
    json!({
        "patron_id": id,
        "userid": userid,
        "surname": format!("Surname {id}"),
        "library_id": "CPL",
        "category_id": "PT"
    })
}
