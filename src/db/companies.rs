use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Company;

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    name: &str,
    slug: &str,
) -> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "INSERT INTO companies (id, name, slug) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(name)
    .bind(slug)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn slug_taken<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    slug: &str,
) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM companies WHERE slug = $1)")
        .bind(slug)
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn count_all<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companies")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn rename(pool: &PgPool, id: Uuid, name: &str) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "UPDATE companies SET name = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await
}
