use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::auth::extractor::TenantContext;
use crate::db;
use crate::entity::{self, Entity};
use crate::error::{ApiResponse, AppError};
use crate::export;
use crate::import::{parser, pipeline};
use crate::middleware::audit;
use crate::state::SharedState;

/// `POST /api/<path>/import`: JSON, CSV or multipart CSV. Responds 200 with
/// the per-row report once processing has started.
pub async fn import<E: Entity>(
    ctx: TenantContext,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<pipeline::ImportReport>>, AppError> {
    let table = parser::parse_body(&headers, body, E::PLURAL)
        .await
        .map_err(AppError::Validation)?;

    let prepared = pipeline::prepare::<E>(table, state.config.max_import_rows)?;
    let report = pipeline::run::<E>(&state.pool, ctx.company_id, prepared).await?;

    tracing::info!(
        "Imported {} {} for company {} ({} failed)",
        report.success_count,
        E::TABLE,
        ctx.company_id,
        report.error_count
    );

    if report.success_count > 0 {
        state.cache.invalidate(E::TABLE, ctx.company_id);
    }
    audit::log_event(
        &state.pool,
        &ctx,
        &entity::audit_action::<E>("imported"),
        E::KIND,
        None,
        Some(json!({
            "successCount": report.success_count,
            "errorCount": report.error_count,
        })),
    )
    .await;

    Ok(Json(ApiResponse::ok(report)))
}

pub async fn export<E: Entity>(
    ctx: TenantContext,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = db::entity::list_for_export::<E>(&state.pool, ctx.company_id).await?;
    let csv = export::to_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", E::PATH),
            ),
        ],
        csv,
    ))
}
