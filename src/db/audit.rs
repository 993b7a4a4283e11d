use sqlx::PgPool;
use uuid::Uuid;

use crate::models::AuditLog;

/// Filters for the audit log listing. `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub entity: Option<String>,
    pub entity_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

pub async fn log_event(
    pool: &PgPool,
    company_id: Uuid,
    user_id: Option<Uuid>,
    action: &str,
    entity: &str,
    entity_id: Option<Uuid>,
    details: Option<serde_json::Value>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_logs (id, company_id, user_id, action, entity, entity_id, details)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(Uuid::now_v7())
    .bind(company_id)
    .bind(user_id)
    .bind(action)
    .bind(entity)
    .bind(entity_id)
    .bind(details)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(
    pool: &PgPool,
    company_id: Uuid,
    filter: &AuditFilter,
) -> Result<Vec<AuditLog>, sqlx::Error> {
    sqlx::query_as::<_, AuditLog>(
        "SELECT * FROM audit_logs
         WHERE company_id = $1
           AND ($2::text IS NULL OR entity = $2)
           AND ($3::uuid IS NULL OR entity_id = $3)
         ORDER BY created_at DESC, id DESC
         LIMIT $4 OFFSET $5",
    )
    .bind(company_id)
    .bind(&filter.entity)
    .bind(filter.entity_id)
    .bind(filter.limit)
    .bind(filter.offset)
    .fetch_all(pool)
    .await
}
