use axum::extract::{Path, Query, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::extractor::TenantContext;
use crate::db::entity::{self as entity_db, ListQuery};
use crate::entity::{self, Entity};
use crate::error::{ApiResponse, AppError};
use crate::middleware::audit;
use crate::state::SharedState;

pub type JsonBody<T> = WithRejection<Json<T>, AppError>;
pub type IdPath = WithRejection<Path<Uuid>, AppError>;

const MAX_LIMIT: i64 = 500;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    pub fn to_query<E: Entity>(&self) -> ListQuery {
        let defaults = ListQuery::default();
        ListQuery {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            sort_column: self
                .sort_by
                .as_deref()
                .map(entity_db::sort_column::<E>)
                .unwrap_or(defaults.sort_column),
            descending: match self.sort_order.as_deref() {
                Some(order) => !order.eq_ignore_ascii_case("asc"),
                None => defaults.descending,
            },
            limit: self.limit.unwrap_or(defaults.limit).clamp(1, MAX_LIMIT),
            offset: self.offset.unwrap_or(0).max(0),
        }
    }
}

pub async fn list<E: Entity>(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let query = params.to_query::<E>();
    let cacheable = query.is_default();

    if cacheable {
        if let Some(rows) = state.cache.get(E::TABLE, ctx.company_id) {
            return Ok(Json(ApiResponse::ok(rows)));
        }
    }

    let generation = state.cache.generation(E::TABLE, ctx.company_id);
    let rows = entity_db::list::<E>(&state.pool, ctx.company_id, &query).await?;
    let rows = serde_json::to_value(&rows)
        .map_err(|e| AppError::Internal(format!("Serialize {} failed: {e}", E::TABLE)))?;

    if cacheable {
        state.cache.put(E::TABLE, ctx.company_id, generation, rows.clone());
    }

    Ok(Json(ApiResponse::ok(rows)))
}

pub async fn get<E: Entity>(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<ApiResponse<E>>, AppError> {
    let record = entity_db::find_by_id::<E>(&state.pool, id, ctx.company_id)
        .await?
        .ok_or_else(|| not_found::<E>())?;

    Ok(Json(ApiResponse::ok(record)))
}

pub async fn create<E: Entity>(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Json(body), _): JsonBody<Value>,
) -> Result<Json<ApiResponse<E>>, AppError> {
    let mut input = entity::parse_input::<E>(body)?;
    entity::validate_input::<E>(&mut input, true).map_err(AppError::Validation)?;

    let mut conn = state.pool.acquire().await?;
    let record = E::insert(&mut conn, ctx.company_id, &input)
        .await
        .map_err(|e| AppError::from_write(e, E::LABEL))?;

    state.cache.invalidate(E::TABLE, ctx.company_id);
    audit::log_event(
        &state.pool,
        &ctx,
        &entity::audit_action::<E>("created"),
        E::KIND,
        Some(record.id()),
        None,
    )
    .await;

    Ok(Json(ApiResponse::ok(record)))
}

pub async fn update<E: Entity>(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(body), _): JsonBody<Value>,
) -> Result<Json<ApiResponse<E>>, AppError> {
    let mut input = entity::parse_input::<E>(body)?;
    entity::validate_input::<E>(&mut input, false).map_err(AppError::Validation)?;

    let mut conn = state.pool.acquire().await?;
    let record = E::update(&mut conn, id, ctx.company_id, &input)
        .await
        .map_err(|e| AppError::from_write(e, E::LABEL))?
        .ok_or_else(|| not_found::<E>())?;

    state.cache.invalidate(E::TABLE, ctx.company_id);
    audit::log_event(
        &state.pool,
        &ctx,
        &entity::audit_action::<E>("updated"),
        E::KIND,
        Some(id),
        serde_json::to_value(&input).ok(),
    )
    .await;

    Ok(Json(ApiResponse::ok(record)))
}

pub async fn delete<E: Entity>(
    ctx: TenantContext,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<ApiResponse<E>>, AppError> {
    let mut tx = state.pool.begin().await?;
    let record = E::delete(&mut tx, id, ctx.company_id)
        .await?
        .ok_or_else(|| not_found::<E>())?;
    tx.commit().await?;

    state.cache.invalidate(E::TABLE, ctx.company_id);
    audit::log_event(
        &state.pool,
        &ctx,
        &entity::audit_action::<E>("deleted"),
        E::KIND,
        Some(id),
        None,
    )
    .await;

    Ok(Json(ApiResponse::ok(record)))
}

pub fn not_found<E: Entity>() -> AppError {
    AppError::NotFound(format!("{} not found", E::LABEL))
}
