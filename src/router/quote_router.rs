use axum::{middleware, routing::{get, post, put}, Router};
use std::sync::Arc;

use crate::handler::quote_handler::{
    approve_quote_handler,
    create_quote_handler,
    customer_approve_quote_handler,
    get_all_quotes_handler,
    get_customer_pending_quotes_handler,
    get_my_quotes_handler,
    get_quote_by_number_handler,
    get_quotes_by_lot_handler,
    get_quotes_by_project_handler,
    get_submitted_quotes_by_project_handler,
    get_submitted_quotes_handler,
    reject_quote_handler,
};
use crate::middlewares::auth_middleware::{contractor_auth, customer_auth, owner_auth, require_auth, AuthState};
use crate::service::quote_service::QuoteServiceImpl;

pub fn quote_router(service: Arc<QuoteServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Contractors submit quotes and list their own
    let contractor = Router::new()
        .route("/quotes", post(create_quote_handler))
        .route("/quotes/mine", get(get_my_quotes_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), contractor_auth));

    // Owner-side review and approval
    let owner = Router::new()
        .route("/quotes", get(get_all_quotes_handler))
        .route("/quotes/submitted", get(get_submitted_quotes_handler))
        .route("/quotes/{quote_number}/approve", put(approve_quote_handler))
        .route("/quotes/{quote_number}/reject", put(reject_quote_handler))
        .route(
            "/projects/{project_identifier}/quotes/submitted",
            get(get_submitted_quotes_by_project_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), owner_auth));

    // Customer-side confirmation of owner-approved quotes
    let customer = Router::new()
        .route("/quotes/pending", get(get_customer_pending_quotes_handler))
        .route("/quotes/{quote_number}/customer-approve", put(customer_approve_quote_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), customer_auth));

    // Lookups available to any authenticated user
    let shared = Router::new()
        .route("/quotes/{quote_number}", get(get_quote_by_number_handler))
        .route("/projects/{project_identifier}/quotes", get(get_quotes_by_project_handler))
        .route("/lots/{lot_identifier}/quotes", get(get_quotes_by_lot_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    contractor
        .merge(owner)
        .merge(customer)
        .merge(shared)
        .with_state(service)
}
