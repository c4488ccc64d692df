use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use wiremock::MockServer;

use linkrec::api::ApiClient;
use linkrec::session::{MemorySessionStore, SessionManager};

/// Client pointed at `server` with a short timeout.
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("failed to build client")
}

/// Session manager over an in-memory store; the store is returned so tests
/// can inspect what was persisted.
#[allow(dead_code)]
pub fn session_for(server: &MockServer) -> (SessionManager, MemorySessionStore) {
    let store = MemorySessionStore::default();
    let manager = SessionManager::new(client_for(server), Arc::new(store.clone()));
    (manager, store)
}

/// Client that already carries bearer token `token`.
#[allow(dead_code)]
pub async fn authed_client(server: &MockServer, token: &str) -> ApiClient {
    let client = client_for(server);
    client.set_token(Some(token.to_string())).await;
    client
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
