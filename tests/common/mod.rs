use mockito::{Mock, ServerGuard};
use rocket::figment::Figment;
use rocket::local::asynchronous::Client;

pub const TOKEN: &str = "test-token";
pub const API_PATH: &str = "/api/v1/user/message";

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}

/// Figment pointing the app at `server`, speaking `wire_format`.
pub fn figment_for(server: &ServerGuard, wire_format: &str) -> Figment {
    rocket::Config::figment()
        .merge(("template_dir", concat!(env!("CARGO_MANIFEST_DIR"), "/templates")))
        .merge(("flash_scope.api_url", format!("{}{}", server.url(), API_PATH)))
        .merge(("flash_scope.token", TOKEN))
        .merge(("flash_scope.wire_format", wire_format))
}

pub async fn client_for(server: &ServerGuard, wire_format: &str) -> Client {
    Client::tracked(flashlib::build(figment_for(server, wire_format)))
        .await
        .expect("valid rocket instance")
}

/// Serves `body` on every authenticated GET to the store.
pub async fn serve_pending(server: &mut ServerGuard, body: &str) -> Mock {
    server
        .mock("GET", API_PATH)
        .match_header("authorization", bearer().as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}
