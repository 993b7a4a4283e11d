use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{Accessory, AccessoryInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("modelNumber", "model_number", "Model Number", FieldKind::Text),
    FieldDef::new("categoryId", "category_id", "Category", FieldKind::Reference),
    FieldDef::new("manufacturerId", "manufacturer_id", "Manufacturer", FieldKind::Reference),
    FieldDef::new("supplierId", "supplier_id", "Supplier", FieldKind::Reference),
    FieldDef::new("locationId", "location_id", "Location", FieldKind::Reference),
    FieldDef::new("quantity", "quantity", "Quantity", FieldKind::Integer),
    FieldDef::new("minQuantity", "min_quantity", "Min Quantity", FieldKind::Integer),
    FieldDef::new("purchasePrice", "purchase_price", "Purchase Price", FieldKind::Decimal),
    FieldDef::new("purchaseDate", "purchase_date", "Purchase Date", FieldKind::Date),
    FieldDef::new("notes", "notes", "Notes", FieldKind::Text),
];

#[async_trait]
impl Entity for Accessory {
    const TABLE: &'static str = "accessories";
    const KIND: &'static str = "ACCESSORY";
    const LABEL: &'static str = "Accessory";
    const PATH: &'static str = "accessories";
    const PLURAL: &'static str = "accessories";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = AccessoryInput;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &AccessoryInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Accessory>(
            "INSERT INTO accessories (id, company_id, name, model_number, category_id,
                 manufacturer_id, supplier_id, location_id, quantity, min_quantity,
                 purchase_price, purchase_date, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 1), $10, $11, $12, $13)
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.model_number)
        .bind(input.category_id)
        .bind(input.manufacturer_id)
        .bind(input.supplier_id)
        .bind(input.location_id)
        .bind(input.quantity)
        .bind(input.min_quantity)
        .bind(input.purchase_price)
        .bind(input.purchase_date)
        .bind(&input.notes)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &AccessoryInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Accessory>(
            "UPDATE accessories SET
                 name = COALESCE($3, name),
                 model_number = COALESCE($4, model_number),
                 category_id = COALESCE($5, category_id),
                 manufacturer_id = COALESCE($6, manufacturer_id),
                 supplier_id = COALESCE($7, supplier_id),
                 location_id = COALESCE($8, location_id),
                 quantity = COALESCE($9, quantity),
                 min_quantity = COALESCE($10, min_quantity),
                 purchase_price = COALESCE($11, purchase_price),
                 purchase_date = COALESCE($12, purchase_date),
                 notes = COALESCE($13, notes),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.model_number)
        .bind(input.category_id)
        .bind(input.manufacturer_id)
        .bind(input.supplier_id)
        .bind(input.location_id)
        .bind(input.quantity)
        .bind(input.min_quantity)
        .bind(input.purchase_price)
        .bind(input.purchase_date)
        .bind(&input.notes)
        .fetch_optional(conn)
        .await
    }
}
