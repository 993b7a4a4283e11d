use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state: `available -> checked_out -> available`, with
/// `archived` terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "asset_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssetState {
    Available,
    CheckedOut,
    Archived,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub model_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub status_label_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub requestable: bool,
    pub notes: Option<String>,
    pub state: AssetState,
    pub assigned_to: Option<Uuid>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub model_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub status_label_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub requestable: Option<bool>,
    pub notes: Option<String>,
}
