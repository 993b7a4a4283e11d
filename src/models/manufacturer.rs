use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manufacturer {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub url: Option<String>,
    pub support_email: Option<String>,
    pub support_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerInput {
    pub name: Option<String>,
    pub url: Option<String>,
    pub support_email: Option<String>,
    pub support_phone: Option<String>,
}
