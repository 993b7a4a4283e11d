use axum::extract::State;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;

use crate::auth::extractor::TenantContext;
use crate::db;
use crate::error::{ApiResponse, AppError};
use crate::middleware::audit;
use crate::models::Company;
use crate::state::SharedState;

use super::crud::JsonBody;

#[derive(Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: String,
}

pub async fn get_company(
    ctx: TenantContext,
    State(state): State<SharedState>,
) -> Result<Json<ApiResponse<Company>>, AppError> {
    let company = db::companies::find_by_id(&state.pool, ctx.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    Ok(Json(ApiResponse::ok(company)))
}

/// Rename the caller's company. The slug is kept so existing logins still work.
pub async fn update_company(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Json(req), _): JsonBody<UpdateCompanyRequest>,
) -> Result<Json<ApiResponse<Company>>, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let company = db::companies::rename(&state.pool, ctx.company_id, name)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    audit::log_event(
        &state.pool,
        &ctx,
        "COMPANY_UPDATED",
        "COMPANY",
        Some(company.id),
        Some(json!({ "name": company.name })),
    )
    .await;

    Ok(Json(ApiResponse::ok(company)))
}
