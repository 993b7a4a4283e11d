use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub license_key: Option<String>,
    pub seats: i32,
    pub seats_allocated: i32,
    pub category_id: Option<Uuid>,
    pub manufacturer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub renewal_date: Option<NaiveDate>,
    pub reorder_threshold: Option<i32>,
    pub licensed_to_email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl License {
    pub fn free_seats(&self) -> i32 {
        self.seats - self.seats_allocated
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInput {
    pub name: Option<String>,
    pub license_key: Option<String>,
    pub seats: Option<i32>,
    pub category_id: Option<Uuid>,
    pub manufacturer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub renewal_date: Option<NaiveDate>,
    pub reorder_threshold: Option<i32>,
    pub licensed_to_email: Option<String>,
    pub notes: Option<String>,
}

/// One seat of a license held by a user.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseAssignment {
    pub id: Uuid,
    pub company_id: Uuid,
    pub license_id: Uuid,
    pub user_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}
