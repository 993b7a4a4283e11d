use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractor::TenantContext;

/// Append an audit row after a successful mutation. Failures are logged and
/// swallowed; the mutation has already been committed.
pub async fn log_event(
    pool: &PgPool,
    ctx: &TenantContext,
    action: &str,
    entity: &str,
    entity_id: Option<Uuid>,
    details: Option<serde_json::Value>,
) {
    if let Err(e) = crate::db::audit::log_event(
        pool,
        ctx.company_id,
        Some(ctx.user_id),
        action,
        entity,
        entity_id,
        details,
    )
    .await
    {
        tracing::error!("Failed to log audit event {action}: {e}");
    }
}
