use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{Supplier, SupplierInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("contactName", "contact_name", "Contact Name", FieldKind::Text),
    FieldDef::new("email", "email", "Email", FieldKind::Email),
    FieldDef::new("phone", "phone", "Phone", FieldKind::Text),
    FieldDef::new("address", "address", "Address", FieldKind::Text),
    FieldDef::new("url", "url", "URL", FieldKind::Url),
];

#[async_trait]
impl Entity for Supplier {
    const TABLE: &'static str = "suppliers";
    const KIND: &'static str = "SUPPLIER";
    const LABEL: &'static str = "Supplier";
    const PATH: &'static str = "suppliers";
    const PLURAL: &'static str = "suppliers";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = SupplierInput;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &SupplierInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Supplier>(
            "INSERT INTO suppliers (id, company_id, name, contact_name, email, phone, address, url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.contact_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.url)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &SupplierInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Supplier>(
            "UPDATE suppliers SET
                 name = COALESCE($3, name),
                 contact_name = COALESCE($4, contact_name),
                 email = COALESCE($5, email),
                 phone = COALESCE($6, phone),
                 address = COALESCE($7, address),
                 url = COALESCE($8, url),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.contact_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.url)
        .fetch_optional(conn)
        .await
    }
}
