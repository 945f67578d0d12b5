//! Helpers shared by the endpoint tests.

use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, build_router,
    store::{SingleTable, initialize},
};

/// A store backed by a fresh in-memory database.
pub fn get_test_store() -> SingleTable {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&connection).expect("Could not create record table");

    SingleTable::new(Arc::new(Mutex::new(connection)))
}

/// A test server running the full router against a fresh in-memory database.
pub fn get_test_server() -> TestServer {
    let (server, _) = get_test_server_and_state();

    server
}

/// Like [get_test_server], but also hands back the state for tests that need
/// direct access to the store or the token keys.
pub fn get_test_server_and_state() -> (TestServer, AppState) {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    let state =
        AppState::new(connection, "test-secret").expect("Could not create the app state");

    let server = TestServer::new(build_router(state.clone()));

    (server, state)
}

/// Register a default test user and return their access token.
pub async fn register_and_log_in(server: &TestServer) -> String {
    register_and_log_in_as(server, "foo@bar.baz", "averysafepassword").await
}

/// Register a user with the given credentials and return their access token.
pub async fn register_and_log_in_as(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/auth/register")
        .json(&json!({
            "email": email,
            "password": password,
            "name": "Test User",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();

    body["tokens"]["accessToken"]
        .as_str()
        .expect("register should return an access token")
        .to_owned()
}
