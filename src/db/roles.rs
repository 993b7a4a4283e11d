use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{Role, RoleInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("description", "description", "Description", FieldKind::Text),
];

#[async_trait]
impl Entity for Role {
    const TABLE: &'static str = "roles";
    const KIND: &'static str = "ROLE";
    const LABEL: &'static str = "Role";
    const PATH: &'static str = "roles";
    const PLURAL: &'static str = "roles";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = RoleInput;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &RoleInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (id, company_id, name, description)
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &RoleInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "UPDATE roles SET
                 name = COALESCE($3, name),
                 description = COALESCE($4, description),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_optional(conn)
        .await
    }
}
