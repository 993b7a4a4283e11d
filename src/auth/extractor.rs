use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::SharedState;

/// Request-scoped tenant context. Every tenant handler takes this extractor,
/// so a missing or invalid session is rejected before the database is touched.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    pub user_id: Uuid,
    pub company_id: Uuid,
}

impl FromRequestParts<SharedState> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .or_else(|| {
                CookieJar::from_headers(&parts.headers)
                    .get("access_token")
                    .map(|c| c.value().to_string())
            })
            .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

        let claims = jwt::decode_token(&token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(TenantContext {
            user_id: claims.sub,
            company_id: claims.cid,
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(auth_header) = parts.headers.get("authorization") else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    Ok(auth_str.strip_prefix("Bearer ").map(|t| t.trim().to_string()))
}
