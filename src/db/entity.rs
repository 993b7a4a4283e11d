use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entity::Entity;

/// Validated listing parameters. `sort_column` is always a known column.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort_column: &'static str,
    pub descending: bool,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort_column: "created_at",
            descending: true,
            limit: 100,
            offset: 0,
        }
    }
}

impl ListQuery {
    /// True when the query asks for the default listing, which is cacheable.
    pub fn is_default(&self) -> bool {
        let d = ListQuery::default();
        self.search.is_none()
            && self.sort_column == d.sort_column
            && self.descending == d.descending
            && self.limit == d.limit
            && self.offset == d.offset
    }
}

/// Resolve an API sort key (`serialNumber`, `createdAt`) to a column.
pub fn sort_column<E: Entity>(key: &str) -> &'static str {
    match key {
        "createdAt" | "created_at" => "created_at",
        "updatedAt" | "updated_at" => "updated_at",
        _ => E::FIELDS
            .iter()
            .find(|f| f.name == key || f.column == key)
            .map(|f| f.column)
            .unwrap_or("created_at"),
    }
}

/// Make `%`, `_` and `\` in a search term match literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub async fn list<E: Entity>(
    pool: &PgPool,
    company_id: Uuid,
    params: &ListQuery,
) -> Result<Vec<E>, sqlx::Error> {
    let order = if params.descending { "DESC" } else { "ASC" };
    let table = E::TABLE;
    let sort_col = params.sort_column;

    if let Some(search) = &params.search {
        let search_pattern = format!("%{}%", escape_like(search));
        let search_col = E::SEARCH_COLUMN;
        sqlx::query_as::<_, E>(&format!(
            "SELECT * FROM {table}
             WHERE company_id = $1 AND {search_col} ILIKE $4 ESCAPE '\\'
             ORDER BY {sort_col} {order}, id LIMIT $2 OFFSET $3"
        ))
        .bind(company_id)
        .bind(params.limit)
        .bind(params.offset)
        .bind(search_pattern)
        .fetch_all(pool)
        .await
    } else {
        sqlx::query_as::<_, E>(&format!(
            "SELECT * FROM {table}
             WHERE company_id = $1
             ORDER BY {sort_col} {order}, id LIMIT $2 OFFSET $3"
        ))
        .bind(company_id)
        .bind(params.limit)
        .bind(params.offset)
        .fetch_all(pool)
        .await
    }
}

/// Every row of the tenant in creation order, for export.
pub async fn list_for_export<E: Entity>(
    pool: &PgPool,
    company_id: Uuid,
) -> Result<Vec<E>, sqlx::Error> {
    sqlx::query_as::<_, E>(&format!(
        "SELECT * FROM {} WHERE company_id = $1 ORDER BY created_at, id",
        E::TABLE
    ))
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id<E: Entity>(
    pool: &PgPool,
    id: Uuid,
    company_id: Uuid,
) -> Result<Option<E>, sqlx::Error> {
    sqlx::query_as::<_, E>(&format!(
        "SELECT * FROM {} WHERE id = $1 AND company_id = $2",
        E::TABLE
    ))
    .bind(id)
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete<E: Entity>(
    conn: &mut PgConnection,
    id: Uuid,
    company_id: Uuid,
) -> Result<Option<E>, sqlx::Error> {
    sqlx::query_as::<_, E>(&format!(
        "DELETE FROM {} WHERE id = $1 AND company_id = $2 RETURNING *",
        E::TABLE
    ))
    .bind(id)
    .bind(company_id)
    .fetch_optional(conn)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("laptop"), "laptop");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like(r"c:\temp"), r"c:\\temp");
    }
}
