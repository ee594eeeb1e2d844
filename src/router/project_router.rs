use axum::{middleware, routing::{delete, get, post, put}, Router};
use std::sync::Arc;

use crate::handler::project_handler::{
    assign_contractor_handler,
    assign_customer_handler,
    assign_salesperson_handler,
    create_project_handler,
    delete_project_handler,
    get_activity_log_handler,
    get_project_handler,
    list_projects_handler,
    remove_contractor_handler,
    remove_customer_handler,
    remove_salesperson_handler,
    update_project_handler,
};
use crate::middlewares::auth_middleware::{owner_auth, require_auth, AuthState};
use crate::service::project_service::ProjectServiceImpl;

pub fn project_router(service: Arc<ProjectServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Reads available to any authenticated user
    let shared = Router::new()
        .route("/projects", get(list_projects_handler))
        .route("/projects/{project_identifier}", get(get_project_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), require_auth));

    // Owner-only mutations, team management and the audit trail
    let owner = Router::new()
        .route("/projects", post(create_project_handler))
        .route("/projects/{project_identifier}", put(update_project_handler))
        .route("/projects/{project_identifier}", delete(delete_project_handler))
        .route("/projects/{project_identifier}/contractor", put(assign_contractor_handler))
        .route("/projects/{project_identifier}/contractor", delete(remove_contractor_handler))
        .route("/projects/{project_identifier}/salesperson", put(assign_salesperson_handler))
        .route("/projects/{project_identifier}/salesperson", delete(remove_salesperson_handler))
        .route("/projects/{project_identifier}/customer", put(assign_customer_handler))
        .route("/projects/{project_identifier}/customer", delete(remove_customer_handler))
        .route("/projects/{project_identifier}/activity-log", get(get_activity_log_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, owner_auth));

    shared.merge(owner).with_state(service)
}
