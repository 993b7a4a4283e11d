use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{Maintenance, MaintenanceInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("assetId", "asset_id", "Asset", FieldKind::Reference).required(),
    FieldDef::new("title", "title", "Title", FieldKind::Text).required(),
    FieldDef::new("maintenanceType", "maintenance_type", "Maintenance Type", FieldKind::Text),
    FieldDef::new("supplierId", "supplier_id", "Supplier", FieldKind::Reference),
    FieldDef::new("startDate", "start_date", "Start Date", FieldKind::Date).required(),
    FieldDef::new("completionDate", "completion_date", "Completion Date", FieldKind::Date),
    FieldDef::new("cost", "cost", "Cost", FieldKind::Decimal),
    FieldDef::new("notes", "notes", "Notes", FieldKind::Text),
];

#[async_trait]
impl Entity for Maintenance {
    const TABLE: &'static str = "maintenances";
    const KIND: &'static str = "MAINTENANCE";
    const LABEL: &'static str = "Maintenance";
    const PATH: &'static str = "maintenances";
    const PLURAL: &'static str = "maintenances";
    const FIELDS: &'static [FieldDef] = FIELDS;
    const SEARCH_COLUMN: &'static str = "title";

    type Input = MaintenanceInput;

    fn id(&self) -> Uuid {
        self.id
    }

    fn normalize(input: &mut MaintenanceInput, _creating: bool) -> Result<(), String> {
        match (input.start_date, input.completion_date) {
            (Some(start), Some(done)) if done < start => {
                Err("Completion Date must not be before Start Date".to_string())
            }
            _ => Ok(()),
        }
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &MaintenanceInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Maintenance>(
            "INSERT INTO maintenances (id, company_id, asset_id, title, maintenance_type,
                 supplier_id, start_date, completion_date, cost, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(input.asset_id)
        .bind(&input.title)
        .bind(&input.maintenance_type)
        .bind(input.supplier_id)
        .bind(input.start_date)
        .bind(input.completion_date)
        .bind(input.cost)
        .bind(&input.notes)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &MaintenanceInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Maintenance>(
            "UPDATE maintenances SET
                 asset_id = COALESCE($3, asset_id),
                 title = COALESCE($4, title),
                 maintenance_type = COALESCE($5, maintenance_type),
                 supplier_id = COALESCE($6, supplier_id),
                 start_date = COALESCE($7, start_date),
                 completion_date = COALESCE($8, completion_date),
                 cost = COALESCE($9, cost),
                 notes = COALESCE($10, notes),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(input.asset_id)
        .bind(&input.title)
        .bind(&input.maintenance_type)
        .bind(input.supplier_id)
        .bind(input.start_date)
        .bind(input.completion_date)
        .bind(input.cost)
        .bind(&input.notes)
        .fetch_optional(conn)
        .await
    }
}
