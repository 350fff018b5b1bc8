use facebook_auth_server::frameworks::server;

#[tokio::main]
async fn main() {
    server::run().await;
}
