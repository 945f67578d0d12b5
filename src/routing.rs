//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState,
    auth::{post_log_in, refresh_tokens, register_user},
    budget::{create_budget, get_budgets},
    endpoints,
    transaction::{
        create_transaction, delete_transaction_by_id, get_transaction_by_id, get_transactions,
        update_transaction,
    },
};

/// Return a router with all the app's routes.
///
/// The transaction and budget handlers extract bearer token claims
/// themselves, so requests without a valid token get a 401 from the
/// extractor before the handler body runs.
pub fn build_router(state: AppState) -> Router {
    // Browser clients call the API from any origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::REFRESH, post(refresh_tokens))
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction).get(get_transactions),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_by_id)
                .put(update_transaction)
                .delete(delete_transaction_by_id),
        )
        .route(endpoints::BUDGETS, post(create_budget).get(get_budgets))
        .layer(cors)
        .with_state(state)
}
