use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{Manufacturer, ManufacturerInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("url", "url", "URL", FieldKind::Url),
    FieldDef::new("supportEmail", "support_email", "Support Email", FieldKind::Email),
    FieldDef::new("supportPhone", "support_phone", "Support Phone", FieldKind::Text),
];

#[async_trait]
impl Entity for Manufacturer {
    const TABLE: &'static str = "manufacturers";
    const KIND: &'static str = "MANUFACTURER";
    const LABEL: &'static str = "Manufacturer";
    const PATH: &'static str = "manufacturers";
    const PLURAL: &'static str = "manufacturers";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = ManufacturerInput;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &ManufacturerInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Manufacturer>(
            "INSERT INTO manufacturers (id, company_id, name, url, support_email, support_phone)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.url)
        .bind(&input.support_email)
        .bind(&input.support_phone)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &ManufacturerInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Manufacturer>(
            "UPDATE manufacturers SET
                 name = COALESCE($3, name),
                 url = COALESCE($4, url),
                 support_email = COALESCE($5, support_email),
                 support_phone = COALESCE($6, support_phone),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.url)
        .bind(&input.support_email)
        .bind(&input.support_phone)
        .fetch_optional(conn)
        .await
    }
}
