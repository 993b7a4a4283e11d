use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STATUS_TYPES: &[&str] = &["deployable", "pending", "undeployable", "archived"];

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLabel {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub status_type: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLabelInput {
    pub name: Option<String>,
    pub color: Option<String>,
    pub status_type: Option<String>,
    pub notes: Option<String>,
}
