use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{Department, DepartmentInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("locationId", "location_id", "Location", FieldKind::Reference),
    FieldDef::new("notes", "notes", "Notes", FieldKind::Text),
];

#[async_trait]
impl Entity for Department {
    const TABLE: &'static str = "departments";
    const KIND: &'static str = "DEPARTMENT";
    const LABEL: &'static str = "Department";
    const PATH: &'static str = "departments";
    const PLURAL: &'static str = "departments";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = DepartmentInput;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &DepartmentInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            "INSERT INTO departments (id, company_id, name, location_id, notes)
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(input.location_id)
        .bind(&input.notes)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &DepartmentInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            "UPDATE departments SET
                 name = COALESCE($3, name),
                 location_id = COALESCE($4, location_id),
                 notes = COALESCE($5, notes),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(input.location_id)
        .bind(&input.notes)
        .fetch_optional(conn)
        .await
    }
}
