use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::AppError;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{Asset, AssetInput, AssetState};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("serialNumber", "serial_number", "Serial Number", FieldKind::Text).required(),
    FieldDef::new("modelId", "model_id", "Model", FieldKind::Reference),
    FieldDef::new("categoryId", "category_id", "Category", FieldKind::Reference),
    FieldDef::new("statusLabelId", "status_label_id", "Status Label", FieldKind::Reference),
    FieldDef::new("locationId", "location_id", "Location", FieldKind::Reference),
    FieldDef::new("departmentId", "department_id", "Department", FieldKind::Reference),
    FieldDef::new("supplierId", "supplier_id", "Supplier", FieldKind::Reference),
    FieldDef::new("purchasePrice", "purchase_price", "Purchase Price", FieldKind::Decimal),
    FieldDef::new("purchaseDate", "purchase_date", "Purchase Date", FieldKind::Date),
    FieldDef::new("requestable", "requestable", "Requestable", FieldKind::Boolean),
    FieldDef::new("notes", "notes", "Notes", FieldKind::Text),
];

#[async_trait]
impl Entity for Asset {
    const TABLE: &'static str = "assets";
    const KIND: &'static str = "ASSET";
    const LABEL: &'static str = "Asset";
    const PATH: &'static str = "assets";
    const PLURAL: &'static str = "assets";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = AssetInput;

    fn id(&self) -> Uuid {
        self.id
    }

    fn normalize(input: &mut AssetInput, _creating: bool) -> Result<(), String> {
        if let Some(serial) = input.serial_number.as_mut() {
            *serial = serial.trim().to_string();
        }
        Ok(())
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &AssetInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Asset>(
            "INSERT INTO assets (id, company_id, name, serial_number, model_id, category_id,
                 status_label_id, location_id, department_id, supplier_id, purchase_price,
                 purchase_date, requestable, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, COALESCE($13, false), $14)
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.serial_number)
        .bind(input.model_id)
        .bind(input.category_id)
        .bind(input.status_label_id)
        .bind(input.location_id)
        .bind(input.department_id)
        .bind(input.supplier_id)
        .bind(input.purchase_price)
        .bind(input.purchase_date)
        .bind(input.requestable)
        .bind(&input.notes)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &AssetInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Asset>(
            "UPDATE assets SET
                 name = COALESCE($3, name),
                 serial_number = COALESCE($4, serial_number),
                 model_id = COALESCE($5, model_id),
                 category_id = COALESCE($6, category_id),
                 status_label_id = COALESCE($7, status_label_id),
                 location_id = COALESCE($8, location_id),
                 department_id = COALESCE($9, department_id),
                 supplier_id = COALESCE($10, supplier_id),
                 purchase_price = COALESCE($11, purchase_price),
                 purchase_date = COALESCE($12, purchase_date),
                 requestable = COALESCE($13, requestable),
                 notes = COALESCE($14, notes),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.serial_number)
        .bind(input.model_id)
        .bind(input.category_id)
        .bind(input.status_label_id)
        .bind(input.location_id)
        .bind(input.department_id)
        .bind(input.supplier_id)
        .bind(input.purchase_price)
        .bind(input.purchase_date)
        .bind(input.requestable)
        .bind(&input.notes)
        .fetch_optional(conn)
        .await
    }

    /// Checked-out assets must be checked in before they can be removed.
    async fn delete(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Self>, AppError> {
        let current = sqlx::query_as::<_, Asset>(
            "SELECT * FROM assets WHERE id = $1 AND company_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut *conn)
        .await?;

        match current {
            None => Ok(None),
            Some(asset) if asset.state == AssetState::CheckedOut => Err(AppError::Conflict(
                "Asset is checked out; check it in before deleting".to_string(),
            )),
            Some(_) => super::entity::delete::<Self>(conn, id, company_id)
                .await
                .map_err(|e| AppError::from_delete(e, Self::LABEL)),
        }
    }
}

/// `available -> checked_out`. `None` when the asset is missing or not available;
/// the conditional WHERE makes concurrent checkouts first-committer-wins.
pub async fn checkout(
    pool: &PgPool,
    id: Uuid,
    company_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Asset>, sqlx::Error> {
    sqlx::query_as::<_, Asset>(
        "UPDATE assets
         SET state = 'checked_out', assigned_to = $3, checked_out_at = now(), updated_at = now()
         WHERE id = $1 AND company_id = $2 AND state = 'available'
         RETURNING *",
    )
    .bind(id)
    .bind(company_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// `checked_out -> available`.
pub async fn checkin(
    pool: &PgPool,
    id: Uuid,
    company_id: Uuid,
) -> Result<Option<Asset>, sqlx::Error> {
    sqlx::query_as::<_, Asset>(
        "UPDATE assets
         SET state = 'available', assigned_to = NULL, checked_out_at = NULL, updated_at = now()
         WHERE id = $1 AND company_id = $2 AND state = 'checked_out'
         RETURNING *",
    )
    .bind(id)
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

/// Any non-archived state `-> archived`, clearing the assignment.
pub async fn archive(
    pool: &PgPool,
    id: Uuid,
    company_id: Uuid,
) -> Result<Option<Asset>, sqlx::Error> {
    sqlx::query_as::<_, Asset>(
        "UPDATE assets
         SET state = 'archived', assigned_to = NULL, checked_out_at = NULL, updated_at = now()
         WHERE id = $1 AND company_id = $2 AND state <> 'archived'
         RETURNING *",
    )
    .bind(id)
    .bind(company_id)
    .fetch_optional(pool)
    .await
}
