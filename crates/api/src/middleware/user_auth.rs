//! JWT bearer authentication middleware.
//!
//! Authentication is an explicit per-request context: this middleware
//! validates the Bearer token and inserts a [`UserAuth`] into request
//! extensions for downstream handlers. There is no ambient auth state.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use shared::jwt::{subject_uuid, JwtKeys};

/// Authenticated user information extracted from the access token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User id from the JWT subject claim.
    pub user_id: Uuid,
    /// JWT id (jti), useful for session correlation in logs.
    #[allow(dead_code)]
    pub jti: String,
}

impl UserAuth {
    /// Validates an access token and builds the request auth context.
    pub fn from_token(keys: &JwtKeys, token: &str) -> Result<Self, String> {
        let claims = keys
            .decode_access(token)
            .map_err(|e| format!("Invalid token: {}", e))?;
        let user_id = subject_uuid(&claims).map_err(|_| "Invalid user id in token".to_string())?;

        Ok(UserAuth {
            user_id,
            jti: claims.jti,
        })
    }
}

/// Middleware that requires a valid Bearer access token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return unauthorized_response("Missing or invalid Authorization header"),
    };

    match UserAuth::from_token(&state.jwt, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_response_status() {
        let response = unauthorized_response("Missing or invalid Authorization header");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn user_auth_is_cloneable() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
            jti: "jti-1".to_string(),
        };
        let cloned = auth.clone();
        assert_eq!(auth.user_id, cloned.user_id);
    }
}
