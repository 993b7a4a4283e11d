use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::TenantContext;
use crate::db;
use crate::db::audit::AuditFilter;
use crate::error::{ApiResponse, AppError};
use crate::models::AuditLog;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditParams {
    pub entity: Option<String>,
    pub entity_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// The tenant's audit trail, newest first.
pub async fn list(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Query(params), _): WithRejection<Query<AuditParams>, AppError>,
) -> Result<Json<ApiResponse<Vec<AuditLog>>>, AppError> {
    let filter = AuditFilter {
        entity: params.entity.map(|e| e.trim().to_uppercase()).filter(|e| !e.is_empty()),
        entity_id: params.entity_id,
        limit: params.limit.unwrap_or(100).clamp(1, 500),
        offset: params.offset.unwrap_or(0).max(0),
    };

    let logs = db::audit::list(&state.pool, ctx.company_id, &filter).await?;
    Ok(Json(ApiResponse::ok(logs)))
}
