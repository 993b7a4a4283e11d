use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::{CookieJar, WithRejection};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::extractor::TenantContext;
use crate::auth::jwt::{encode_token, Claims};
use crate::auth::{password, tokens};
use crate::config::RegistrationMode;
use crate::db;
use crate::entity::{self, Entity};
use crate::error::{ApiResponse, AppError};
use crate::middleware::audit;
use crate::models::company::slugify;
use crate::models::{Company, Role, RoleInput, User, UserInput};
use crate::state::SharedState;

use super::crud::JsonBody;

const REFRESH_DAYS: i64 = 7;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub company_name: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Company slug.
    pub company: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
    pub company: Company,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

type AuthResult = Result<(CookieJar, Json<ApiResponse<AuthResponse>>), AppError>;

fn auth_cookies(access_token: &str, refresh_token: &str) -> CookieJar {
    let access = Cookie::build(("access_token", access_token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(15))
        .build();

    let refresh = Cookie::build(("refresh_token", refresh_token.to_string()))
        .path("/api/auth")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::days(REFRESH_DAYS))
        .build();

    CookieJar::new().add(access).add(refresh)
}

fn clear_auth_cookies() -> CookieJar {
    let access = Cookie::build(("access_token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    let refresh = Cookie::build(("refresh_token", ""))
        .path("/api/auth")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(access).add(refresh)
}

/// Mint an access token and a fresh refresh token for `user`.
async fn issue_session(state: &SharedState, user: User, company: Company) -> AuthResult {
    let claims = Claims::new(user.id, company.id);
    let access_token =
        encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    let refresh = tokens::generate_refresh_token();
    db::refresh_tokens::create(
        &state.pool,
        user.id,
        &tokens::hash_token(&refresh),
        Utc::now() + Duration::days(REFRESH_DAYS),
    )
    .await?;

    let jar = auth_cookies(&access_token, &refresh);
    Ok((
        jar,
        Json(ApiResponse::ok(AuthResponse {
            access_token,
            refresh_token: refresh,
            user,
            company,
        })),
    ))
}

/// Create a company, its admin role and its first user.
pub async fn register(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): JsonBody<RegisterRequest>,
) -> AuthResult {
    let company_name = req.company_name.trim();
    if company_name.is_empty() || req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    let mut user_input = UserInput {
        name: Some(req.name.trim().to_string()),
        email: Some(req.email),
        status: Some("active".to_string()),
        password: Some(req.password),
        ..Default::default()
    };
    entity::validate_input::<User>(&mut user_input, true).map_err(AppError::Validation)?;

    // Serializes concurrent bootstrap registrations.
    let mut tx = state.pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(1)")
        .execute(&mut *tx)
        .await?;

    if state.config.registration == RegistrationMode::Closed
        && db::companies::count_all(&mut *tx).await? > 0
    {
        return Err(AppError::Forbidden(
            "Registration is closed. Ask an administrator for an account.".to_string(),
        ));
    }

    let base = slugify(company_name);
    let slug = if db::companies::slug_taken(&mut *tx, &base).await? {
        format!("{base}-{:08x}", rand::random::<u32>())
    } else {
        base
    };
    let company = db::companies::create(&mut *tx, company_name, &slug).await?;

    let role_input = RoleInput {
        name: Some("Admin".to_string()),
        description: Some("Full access to the company".to_string()),
    };
    let role = Role::insert(&mut tx, company.id, &role_input)
        .await
        .map_err(|e| AppError::from_write(e, Role::LABEL))?;

    user_input.role_id = Some(role.id);
    let user = User::insert(&mut tx, company.id, &user_input)
        .await
        .map_err(|e| AppError::from_write(e, User::LABEL))?;

    tx.commit().await?;

    tracing::info!("Registered company {} ({})", company.slug, company.id);

    let ctx = TenantContext {
        user_id: user.id,
        company_id: company.id,
    };
    audit::log_event(&state.pool, &ctx, "COMPANY_REGISTERED", "COMPANY", Some(company.id), None)
        .await;

    issue_session(&state, user, company).await
}

pub async fn login(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): JsonBody<LoginRequest>,
) -> AuthResult {
    let slug = req.company.trim().to_lowercase();

    if let Err(retry_after) = state.login_limiter.check(&slug, &req.email) {
        return Err(AppError::RateLimited(format!(
            "Too many login attempts. Try again in {retry_after} seconds."
        )));
    }

    let invalid = || {
        state.login_limiter.record_failure(&slug, &req.email);
        AppError::Unauthorized("Invalid credentials".to_string())
    };

    let company = db::companies::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(invalid)?;
    let user = db::users::find_by_email(&state.pool, company.id, &req.email)
        .await?
        .ok_or_else(invalid)?;
    let hash = user.password_hash.as_deref().ok_or_else(invalid)?;

    if !password::verify(&req.password, hash).map_err(AppError::Internal)? {
        return Err(invalid());
    }
    if !user.is_active() {
        return Err(AppError::Unauthorized("Account is inactive".to_string()));
    }

    state.login_limiter.reset(&slug, &req.email);

    let ctx = TenantContext {
        user_id: user.id,
        company_id: company.id,
    };
    audit::log_event(&state.pool, &ctx, "USER_LOGGED_IN", User::KIND, Some(user.id), None).await;

    issue_session(&state, user, company).await
}

/// Rotate the refresh token. Presenting an already used token revokes every
/// session of its owner.
pub async fn refresh(State(state): State<SharedState>, jar: CookieJar) -> AuthResult {
    let refresh_value = jar
        .get("refresh_token")
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::Unauthorized("Missing refresh token".to_string()))?;

    let stored = db::refresh_tokens::find_by_hash(&state.pool, &tokens::hash_token(&refresh_value))
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    if stored.expires_at < Utc::now() {
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    if stored.used || !db::refresh_tokens::mark_used(&state.pool, stored.id).await? {
        tracing::warn!(
            "Refresh token reuse detected for user {}; revoking all sessions",
            stored.user_id
        );
        db::refresh_tokens::delete_all_for_user(&state.pool, stored.user_id).await?;
        return Err(AppError::Unauthorized(
            "Refresh token reuse detected. All sessions revoked.".to_string(),
        ));
    }

    let user = db::users::find_by_id(&state.pool, stored.user_id)
        .await?
        .filter(User::is_active)
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
    let company = db::companies::find_by_id(&state.pool, user.company_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Company not found".to_string()))?;

    issue_session(&state, user, company).await
}

pub async fn logout(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<MessageResponse>>), AppError> {
    if let Some(cookie) = jar.get("refresh_token") {
        db::refresh_tokens::delete_by_hash(&state.pool, &tokens::hash_token(cookie.value())).await?;
    }

    Ok((
        clear_auth_cookies(),
        Json(ApiResponse::ok(MessageResponse {
            message: "Logged out successfully".to_string(),
        })),
    ))
}
