use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{Category, CategoryInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("categoryType", "category_type", "Category Type", FieldKind::Text),
    FieldDef::new("notes", "notes", "Notes", FieldKind::Text),
];

#[async_trait]
impl Entity for Category {
    const TABLE: &'static str = "categories";
    const KIND: &'static str = "CATEGORY";
    const LABEL: &'static str = "Category";
    const PATH: &'static str = "categories";
    const PLURAL: &'static str = "categories";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = CategoryInput;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &CategoryInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, company_id, name, category_type, notes)
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.category_type)
        .bind(&input.notes)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &CategoryInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET
                 name = COALESCE($3, name),
                 category_type = COALESCE($4, category_type),
                 notes = COALESCE($5, notes),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.category_type)
        .bind(&input.notes)
        .fetch_optional(conn)
        .await
    }
}
