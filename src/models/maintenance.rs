use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A repair, upgrade or service event on an asset.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    pub id: Uuid,
    pub company_id: Uuid,
    pub asset_id: Uuid,
    pub title: String,
    pub maintenance_type: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceInput {
    pub asset_id: Option<Uuid>,
    pub title: Option<String>,
    pub maintenance_type: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
}
