//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    Error,
    auth::token::AuthKeys,
    store::{SingleTable, initialize},
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The single-table store backing all entities.
    pub store: SingleTable,
    /// The keys for signing and verifying bearer tokens.
    pub auth_keys: AuthKeys,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the record table.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(connection: Connection, jwt_secret: &str) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            store: SingleTable::new(Arc::new(Mutex::new(connection))),
            auth_keys: AuthKeys::new(jwt_secret),
        })
    }
}

// this impl tells the `Claims` extractor how to access the keys from our state
impl FromRef<AppState> for AuthKeys {
    fn from_ref(state: &AppState) -> Self {
        state.auth_keys.clone()
    }
}
