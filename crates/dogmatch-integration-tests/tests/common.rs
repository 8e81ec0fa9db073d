//! Common test utilities for integration tests

use dogmatch_client::{FetchConfig, FetchConnector};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Connector pointed at the mock service
pub fn connector(server: &MockServer) -> Arc<FetchConnector> {
    Arc::new(
        FetchConnector::new(FetchConfig::default().with_base_url(server.uri()))
            .expect("connector for mock server"),
    )
}

/// Dog record in the service's wire format
pub fn dog_json(id: &str, breed: &str) -> Value {
    json!({
        "id": id,
        "img": format!("https://img.example/{}.jpg", id),
        "name": format!("Dog {}", id),
        "age": 4,
        "zip_code": "60601",
        "breed": breed
    })
}

/// Accept a login and hand out the session cookie
#[allow(dead_code)]
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "fetch-access-token=e2e-token; Path=/; HttpOnly")
                .set_body_string("OK"),
        )
        .mount(server)
        .await;
}
