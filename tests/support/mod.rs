#![allow(dead_code)]

use std::sync::Arc;

use lumo::auth::{AuthError, Credential, MemorySessionSlot, SessionSlot};
use lumo::client::LumoClient;
use lumo::config::LumoConfig;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client pointed at the mock server, backed by an in-memory slot.
pub fn client(server: &MockServer) -> LumoClient {
    client_with_slot(server, Arc::new(MemorySessionSlot::new()))
}

pub fn client_with_slot(server: &MockServer, slot: Arc<dyn SessionSlot>) -> LumoClient {
    LumoClient::with_slot(LumoConfig::new().with_api_url(server.uri()), slot)
        .expect("client builds")
}

/// Client that already holds `token`.
pub fn signed_in_client(server: &MockServer, token: &str) -> LumoClient {
    let client = client(server);
    client.store().set(Credential::new(token));
    client
}

pub async fn mount_csrf(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/csrf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "csrfToken": "csrf-1" })))
        .mount(server)
        .await;
}

pub fn photo_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "imageUrl": format!("https://img.example/{id}.jpg"),
        "aiGeneratedTags": ["beach", "sunset"],
        "customTags": ["holiday"],
        "colorPalette": ["#ff8800"],
        "userId": "u1",
        "createdAt": "2024-05-01T10:00:00Z"
    })
}

/// Slot whose every operation fails, for exercising the store's fallbacks.
pub struct BrokenSlot;

impl SessionSlot for BrokenSlot {
    fn load(&self, _key: &str) -> Result<Option<String>, AuthError> {
        Err(AuthError::Io("disk unavailable".to_string()))
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), AuthError> {
        Err(AuthError::Io("disk unavailable".to_string()))
    }

    fn clear(&self, _key: &str) -> Result<(), AuthError> {
        Err(AuthError::Io("disk unavailable".to_string()))
    }
}
