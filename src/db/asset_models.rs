use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{AssetModel, AssetModelInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("modelNumber", "model_number", "Model Number", FieldKind::Text),
    FieldDef::new("manufacturerId", "manufacturer_id", "Manufacturer", FieldKind::Reference),
    FieldDef::new("categoryId", "category_id", "Category", FieldKind::Reference),
    FieldDef::new("notes", "notes", "Notes", FieldKind::Text),
];

#[async_trait]
impl Entity for AssetModel {
    const TABLE: &'static str = "asset_models";
    const KIND: &'static str = "MODEL";
    const LABEL: &'static str = "Model";
    const PATH: &'static str = "models";
    const PLURAL: &'static str = "models";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = AssetModelInput;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &AssetModelInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AssetModel>(
            "INSERT INTO asset_models (id, company_id, name, model_number, manufacturer_id,
                 category_id, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.model_number)
        .bind(input.manufacturer_id)
        .bind(input.category_id)
        .bind(&input.notes)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &AssetModelInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AssetModel>(
            "UPDATE asset_models SET
                 name = COALESCE($3, name),
                 model_number = COALESCE($4, model_number),
                 manufacturer_id = COALESCE($5, manufacturer_id),
                 category_id = COALESCE($6, category_id),
                 notes = COALESCE($7, notes),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.model_number)
        .bind(input.manufacturer_id)
        .bind(input.category_id)
        .bind(&input.notes)
        .fetch_optional(conn)
        .await
    }
}
