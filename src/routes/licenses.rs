use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::extractor::TenantContext;
use crate::db;
use crate::entity::Entity;
use crate::error::{ApiResponse, AppError};
use crate::middleware::audit;
use crate::models::{License, LicenseAssignment};
use crate::state::SharedState;

use super::crud::{not_found, IdPath, JsonBody};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRequest {
    pub user_id: Uuid,
}

pub async fn list_seats(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<ApiResponse<Vec<LicenseAssignment>>>, AppError> {
    db::entity::find_by_id::<License>(&state.pool, id, ctx.company_id)
        .await?
        .ok_or_else(not_found::<License>)?;

    let seats = db::licenses::list_assignments(&state.pool, id, ctx.company_id).await?;
    Ok(Json(ApiResponse::ok(seats)))
}

/// Take a free seat for a user. The count and the assignment commit together.
pub async fn assign_seat(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(req), _): JsonBody<SeatRequest>,
) -> Result<Json<ApiResponse<LicenseAssignment>>, AppError> {
    let mut tx = state.pool.begin().await?;

    if !db::licenses::allocate_seat(&mut tx, id, ctx.company_id).await? {
        drop(tx);
        db::entity::find_by_id::<License>(&state.pool, id, ctx.company_id)
            .await?
            .ok_or_else(not_found::<License>)?;
        return Err(AppError::Validation("No seats available".to_string()));
    }

    let assignment = db::licenses::create_assignment(&mut tx, id, ctx.company_id, req.user_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Validation("User already holds a seat of this license".to_string())
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::Validation("User not found".to_string())
            }
            other => AppError::Database(other),
        })?;

    tx.commit().await?;

    state.cache.invalidate(License::TABLE, ctx.company_id);
    audit::log_event(
        &state.pool,
        &ctx,
        "LICENSE_SEAT_ASSIGNED",
        License::KIND,
        Some(id),
        Some(json!({ "userId": req.user_id })),
    )
    .await;

    Ok(Json(ApiResponse::ok(assignment)))
}

pub async fn release_seat(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Path((id, user_id)), _): WithRejection<Path<(Uuid, Uuid)>, AppError>,
) -> Result<Json<ApiResponse<LicenseAssignment>>, AppError> {
    let mut tx = state.pool.begin().await?;

    let assignment = db::licenses::delete_assignment(&mut tx, id, ctx.company_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Seat assignment not found".to_string()))?;
    db::licenses::free_seat(&mut tx, id, ctx.company_id).await?;

    tx.commit().await?;

    state.cache.invalidate(License::TABLE, ctx.company_id);
    audit::log_event(
        &state.pool,
        &ctx,
        "LICENSE_SEAT_RELEASED",
        License::KIND,
        Some(id),
        Some(json!({ "userId": user_id })),
    )
    .await;

    Ok(Json(ApiResponse::ok(assignment)))
}

/// Licenses at or below their reorder threshold of free seats.
pub async fn reorder(
    ctx: TenantContext,
    State(state): State<SharedState>,
) -> Result<Json<ApiResponse<Vec<License>>>, AppError> {
    let licenses = db::licenses::list_reorder(&state.pool, ctx.company_id).await?;
    Ok(Json(ApiResponse::ok(licenses)))
}
