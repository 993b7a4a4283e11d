use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::import::fields::{self, FieldDef};

/// A tenant-owned record exposed through the generic CRUD, import and export
/// handlers. Implementations live next to their SQL in `db::*`.
#[async_trait]
pub trait Entity:
    for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static
{
    const TABLE: &'static str;
    /// Audit action prefix, e.g. `ASSET` for `ASSET_CREATED`.
    const KIND: &'static str;
    /// Singular name used in messages and as the audit entity.
    const LABEL: &'static str;
    /// URL segment under `/api`.
    const PATH: &'static str;
    /// Array key of JSON import bodies.
    const PLURAL: &'static str;
    /// Writable, importable fields in export column order.
    const FIELDS: &'static [FieldDef];
    const SEARCH_COLUMN: &'static str = "name";

    /// Create/update payload. Every field is optional so that one shape
    /// serves both insert (required fields enforced) and merge-update.
    type Input: DeserializeOwned + Serialize + Send + Sync + 'static;

    fn id(&self) -> Uuid;

    /// Entity-specific rules beyond the declared field checks. May rewrite
    /// the input (e.g. lowercase emails, hash passwords).
    fn normalize(_input: &mut Self::Input, _creating: bool) -> Result<(), String> {
        Ok(())
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &Self::Input,
    ) -> Result<Self, sqlx::Error>;

    /// Merge non-null input fields into the stored row. `None` when the row
    /// is not in the tenant.
    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &Self::Input,
    ) -> Result<Option<Self>, sqlx::Error>;

    async fn delete(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Self>, AppError> {
        db::entity::delete::<Self>(conn, id, company_id)
            .await
            .map_err(|e| AppError::from_delete(e, Self::LABEL))
    }
}

/// Deserialize a JSON create/update body, treating blank optional strings as absent.
pub fn parse_input<E: Entity>(mut body: Value) -> Result<E::Input, AppError> {
    if let Some(obj) = body.as_object_mut() {
        fields::clear_blanks(obj, E::FIELDS);
    }
    serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
}

/// Run the declared field checks and the entity's own rules.
pub fn validate_input<E: Entity>(input: &mut E::Input, creating: bool) -> Result<(), String> {
    let value = serde_json::to_value(&*input).map_err(|e| format!("Invalid input: {e}"))?;

    let errors = fields::validate(&value, E::FIELDS, creating);
    if !errors.is_empty() {
        return Err(errors.join("; "));
    }

    E::normalize(input, creating)
}

/// `ASSET` + `created` -> `ASSET_CREATED`.
pub fn audit_action<E: Entity>(verb: &str) -> String {
    format!("{}_{}", E::KIND, verb.to_uppercase())
}
