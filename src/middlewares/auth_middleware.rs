use axum::{body::Body, extract::State, http::Request, http::StatusCode, middleware::Next, response::Response};
use std::sync::Arc;

use crate::util::jwt::{Claims, JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

/// Validate the bearer token on the request and return its claims.
fn authenticate(state: &AuthState, req: &Request<Body>) -> Result<Claims, StatusCode> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    state
        .jwt_utils
        .validate_token(&token)
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

fn run_with_role(
    state: &AuthState,
    req: &mut Request<Body>,
    required_role: Option<&str>,
) -> Result<(), StatusCode> {
    let claims = authenticate(state, req)?;

    if let Some(required) = required_role {
        if claims.role != required {
            return Err(StatusCode::FORBIDDEN);
        }
    }

    // Make the actor identity available to handlers
    req.extensions_mut().insert(claims);
    Ok(())
}

/// Any authenticated user.
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    run_with_role(&state, &mut req, None)?;
    Ok(next.run(req).await)
}

pub async fn owner_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    run_with_role(&state, &mut req, Some("OWNER"))?;
    Ok(next.run(req).await)
}

pub async fn contractor_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    run_with_role(&state, &mut req, Some("CONTRACTOR"))?;
    Ok(next.run(req).await)
}

pub async fn customer_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    run_with_role(&state, &mut req, Some("CUSTOMER"))?;
    Ok(next.run(req).await)
}
