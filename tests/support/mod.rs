// Shared bootstrapping for integration tests: a mocked Graph API plus a
// server bound to an ephemeral port.
use facebook_auth_server::frameworks::config::{AppConfig, FacebookConfig, TokenConfig};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_TOKEN: &str = "client-token";

// Start the auth server against `graph_url` and return its base URL.
pub async fn spawn_server(graph_url: String) -> String {
    // Bind before spawning so requests queue until the router is ready.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    let config = AppConfig {
        port: addr.port(),
        database_url: None,
        facebook: FacebookConfig {
            client_id: "app-id".to_string(),
            client_secret: "app-secret".to_string(),
            graph_url,
            timeout_ms: 2_000,
        },
        token: TokenConfig {
            secret: "integration-secret".to_string(),
            ttl_ms: 60_000,
        },
    };

    tokio::spawn(async move {
        facebook_auth_server::serve(listener, config)
            .await
            .expect("server failed");
    });

    format!("http://{addr}")
}

// Mount a Graph API that resolves CLIENT_TOKEN to the given profile.
pub async fn mount_graph_api(server: &MockServer, name: &str, email: &str) {
    Mock::given(method("GET"))
        .and(path("/oauth/access_token"))
        .and(query_param("grant_type", "client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "app-token"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/debug_token"))
        .and(query_param("access_token", "app-token"))
        .and(query_param("input_token", CLIENT_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "is_valid": true, "user_id": "1234" }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1234"))
        .and(query_param("access_token", CLIENT_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1234",
            "name": name,
            "email": email
        })))
        .mount(server)
        .await;
}
