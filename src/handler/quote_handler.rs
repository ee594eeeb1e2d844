use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Extension, Json};
use std::sync::Arc;
use validator::Validate;

use crate::dto::quote_dto::{CreateQuoteRequest, RejectQuoteRequest};
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

/// POST /quotes (contractor). The acting contractor comes from the bearer
/// token, never from the payload.
pub async fn create_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let created = service.create_quote(payload, &claims.sub).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /quotes/{quote_number}
pub async fn get_quote_by_number_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(quote_number): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let quote = service.get_quote_by_number(&quote_number).await?;
    Ok(Json(quote))
}

// GET /projects/{project_identifier}/quotes
pub async fn get_quotes_by_project_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(project_identifier): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotes = service.get_quotes_by_project(&project_identifier).await?;
    Ok(Json(quotes))
}

// GET /lots/{lot_identifier}/quotes
pub async fn get_quotes_by_lot_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(lot_identifier): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotes = service.get_quotes_by_lot(&lot_identifier).await?;
    Ok(Json(quotes))
}

/// GET /quotes/mine (contractor): quotes created by the acting contractor.
pub async fn get_my_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotes = service.get_quotes_by_contractor(&claims.sub).await?;
    Ok(Json(quotes))
}

// GET /quotes (owner, newest first)
pub async fn get_all_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotes = service.get_all_quotes().await?;
    Ok(Json(quotes))
}

// GET /quotes/submitted (owner)
pub async fn get_submitted_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotes = service.get_submitted_quotes().await?;
    Ok(Json(quotes))
}

// GET /projects/{project_identifier}/quotes/submitted (owner)
pub async fn get_submitted_quotes_by_project_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(project_identifier): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotes = service.get_submitted_quotes_by_project(&project_identifier).await?;
    Ok(Json(quotes))
}

// GET /quotes/pending (customer)
pub async fn get_customer_pending_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotes = service.get_customer_pending_quotes(&claims.sub).await?;
    Ok(Json(quotes))
}

// PUT /quotes/{quote_number}/approve (owner)
pub async fn approve_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(quote_number): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let quote = service.approve_quote(&quote_number, &claims.sub).await?;
    Ok(Json(quote))
}

// PUT /quotes/{quote_number}/reject (owner)
pub async fn reject_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(quote_number): Path<String>,
    Json(payload): Json<RejectQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let quote = service
        .reject_quote(&quote_number, &payload.rejection_reason, &claims.sub)
        .await?;
    Ok(Json(quote))
}

// PUT /quotes/{quote_number}/customer-approve (customer)
pub async fn customer_approve_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(quote_number): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let quote = service.customer_approve_quote(&quote_number, &claims.sub).await?;
    Ok(Json(quote))
}
