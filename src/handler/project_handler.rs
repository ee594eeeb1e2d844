use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Extension, Json};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::dto::project_dto::{
    AssignContractorRequest, AssignCustomerRequest, AssignSalespersonRequest, CreateProjectRequest,
    UpdateProjectRequest,
};
use crate::model::project::ProjectStatus;
use crate::service::project_service::{ProjectService, ProjectServiceImpl};
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

/// GET /projects with optional `status` / `customerId` filters.
pub async fn list_projects_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Some(status) = params.get("status") {
        let status: ProjectStatus = serde_json::from_value(serde_json::Value::String(status.clone()))
            .map_err(|_| HandlerError::bad_request(format!("Invalid project status: {}", status)))?;
        let projects = service.get_projects_by_status(status).await?;
        return Ok(Json(projects));
    }
    if let Some(customer_id) = params.get("customerId") {
        let projects = service.get_projects_by_customer(customer_id).await?;
        return Ok(Json(projects));
    }
    let projects = service.get_all_projects().await?;
    Ok(Json(projects))
}

// GET /projects/{project_identifier}
pub async fn get_project_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Path(project_identifier): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let project = service.get_project_by_identifier(&project_identifier).await?;
    Ok(Json(project))
}

// POST /projects (owner)
pub async fn create_project_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let project = service.create_project(payload).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

// PUT /projects/{project_identifier} (owner)
pub async fn update_project_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Path(project_identifier): Path<String>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let project = service.update_project(&project_identifier, payload).await?;
    Ok(Json(project))
}

// DELETE /projects/{project_identifier} (owner)
pub async fn delete_project_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Path(project_identifier): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    service.delete_project(&project_identifier).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /projects/{project_identifier}/contractor (owner)
pub async fn assign_contractor_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(project_identifier): Path<String>,
    Json(payload): Json<AssignContractorRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let project = service
        .assign_contractor_to_project(&project_identifier, payload.contractor_id, &claims.sub)
        .await?;
    Ok(Json(project))
}

// DELETE /projects/{project_identifier}/contractor (owner)
pub async fn remove_contractor_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(project_identifier): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let project = service
        .remove_contractor_from_project(&project_identifier, &claims.sub)
        .await?;
    Ok(Json(project))
}

// PUT /projects/{project_identifier}/salesperson (owner)
pub async fn assign_salesperson_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(project_identifier): Path<String>,
    Json(payload): Json<AssignSalespersonRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let project = service
        .assign_salesperson_to_project(&project_identifier, payload.salesperson_id, &claims.sub)
        .await?;
    Ok(Json(project))
}

// DELETE /projects/{project_identifier}/salesperson (owner)
pub async fn remove_salesperson_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(project_identifier): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let project = service
        .remove_salesperson_from_project(&project_identifier, &claims.sub)
        .await?;
    Ok(Json(project))
}

// PUT /projects/{project_identifier}/customer (owner)
pub async fn assign_customer_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(project_identifier): Path<String>,
    Json(payload): Json<AssignCustomerRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let project = service
        .assign_customer_to_project(&project_identifier, payload.customer_id, &claims.sub)
        .await?;
    Ok(Json(project))
}

// DELETE /projects/{project_identifier}/customer (owner)
pub async fn remove_customer_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(project_identifier): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let project = service
        .remove_customer_from_project(&project_identifier, &claims.sub)
        .await?;
    Ok(Json(project))
}

// GET /projects/{project_identifier}/activity-log (owner)
pub async fn get_activity_log_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Path(project_identifier): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let entries = service.get_project_activity_log(&project_identifier).await?;
    Ok(Json(entries))
}
