use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessory {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub model_number: Option<String>,
    pub category_id: Option<Uuid>,
    pub manufacturer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub quantity: i32,
    pub min_quantity: Option<i32>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryInput {
    pub name: Option<String>,
    pub model_number: Option<String>,
    pub category_id: Option<Uuid>,
    pub manufacturer_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub min_quantity: Option<i32>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
}
