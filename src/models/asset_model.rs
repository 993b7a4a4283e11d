use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product line (e.g. "ThinkPad X1 Gen 11") that assets are instances of.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetModel {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub model_number: Option<String>,
    pub manufacturer_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetModelInput {
    pub name: Option<String>,
    pub model_number: Option<String>,
    pub manufacturer_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub notes: Option<String>,
}
