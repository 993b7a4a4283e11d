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
use crate::models::{Asset, AssetState, User};
use crate::state::SharedState;

use super::crud::{not_found, IdPath, JsonBody};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: Uuid,
}

pub async fn checkout(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(req), _): JsonBody<CheckoutRequest>,
) -> Result<Json<ApiResponse<Asset>>, AppError> {
    let assignee = db::entity::find_by_id::<User>(&state.pool, req.user_id, ctx.company_id)
        .await?
        .ok_or_else(|| AppError::Validation("User not found".to_string()))?;
    if !assignee.is_active() {
        return Err(AppError::Validation(
            "Cannot check out to an inactive user".to_string(),
        ));
    }

    let Some(asset) = db::assets::checkout(&state.pool, id, ctx.company_id, assignee.id)
        .await
        .map_err(|e| AppError::from_write(e, Asset::LABEL))?
    else {
        return Err(transition_error(&state, id, ctx.company_id, "check out").await);
    };

    finish(&state, &ctx, &asset, "ASSET_CHECKED_OUT", Some(json!({ "userId": assignee.id }))).await;
    Ok(Json(ApiResponse::ok(asset)))
}

pub async fn checkin(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<ApiResponse<Asset>>, AppError> {
    let Some(asset) = db::assets::checkin(&state.pool, id, ctx.company_id).await? else {
        return Err(transition_error(&state, id, ctx.company_id, "check in").await);
    };

    finish(&state, &ctx, &asset, "ASSET_CHECKED_IN", None).await;
    Ok(Json(ApiResponse::ok(asset)))
}

pub async fn archive(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<ApiResponse<Asset>>, AppError> {
    let Some(asset) = db::assets::archive(&state.pool, id, ctx.company_id).await? else {
        return Err(transition_error(&state, id, ctx.company_id, "archive").await);
    };

    finish(&state, &ctx, &asset, "ASSET_ARCHIVED", None).await;
    Ok(Json(ApiResponse::ok(asset)))
}

async fn finish(
    state: &SharedState,
    ctx: &TenantContext,
    asset: &Asset,
    action: &str,
    details: Option<serde_json::Value>,
) {
    state.cache.invalidate(Asset::TABLE, ctx.company_id);
    audit::log_event(&state.pool, ctx, action, Asset::KIND, Some(asset.id), details).await;
}

/// Explain why a conditional transition matched no row.
async fn transition_error(state: &SharedState, id: Uuid, company_id: Uuid, verb: &str) -> AppError {
    match db::entity::find_by_id::<Asset>(&state.pool, id, company_id).await {
        Ok(Some(asset)) => AppError::Validation(rejection_message(asset.state, verb)),
        Ok(None) => not_found::<Asset>(),
        Err(e) => AppError::Database(e),
    }
}

fn rejection_message(current: AssetState, verb: &str) -> String {
    match (current, verb) {
        (AssetState::CheckedOut, "check out") => "Asset is already checked out".to_string(),
        (AssetState::Available, "check in") => "Asset is not checked out".to_string(),
        (AssetState::Archived, "archive") => "Asset is already archived".to_string(),
        (AssetState::Archived, _) => format!("Cannot {verb} an archived asset"),
        (_, _) => format!("Cannot {verb} asset in its current state"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_name_the_conflict() {
        assert_eq!(
            rejection_message(AssetState::CheckedOut, "check out"),
            "Asset is already checked out"
        );
        assert_eq!(
            rejection_message(AssetState::Available, "check in"),
            "Asset is not checked out"
        );
        assert_eq!(
            rejection_message(AssetState::Archived, "check out"),
            "Cannot check out an archived asset"
        );
        assert_eq!(
            rejection_message(AssetState::Archived, "archive"),
            "Asset is already archived"
        );
    }
}
