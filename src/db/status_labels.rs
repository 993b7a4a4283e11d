use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::status_label::STATUS_TYPES;
use crate::models::{StatusLabel, StatusLabelInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("color", "color", "Color", FieldKind::Text),
    FieldDef::new("statusType", "status_type", "Status Type", FieldKind::Choice(STATUS_TYPES)),
    FieldDef::new("notes", "notes", "Notes", FieldKind::Text),
];

#[async_trait]
impl Entity for StatusLabel {
    const TABLE: &'static str = "status_labels";
    const KIND: &'static str = "STATUS_LABEL";
    const LABEL: &'static str = "Status label";
    const PATH: &'static str = "status-labels";
    const PLURAL: &'static str = "statusLabels";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = StatusLabelInput;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &StatusLabelInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, StatusLabel>(
            "INSERT INTO status_labels (id, company_id, name, color, status_type, notes)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'deployable'), $6) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.color)
        .bind(&input.status_type)
        .bind(&input.notes)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &StatusLabelInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, StatusLabel>(
            "UPDATE status_labels SET
                 name = COALESCE($3, name),
                 color = COALESCE($4, color),
                 status_type = COALESCE($5, status_type),
                 notes = COALESCE($6, notes),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.color)
        .bind(&input.status_type)
        .bind(&input.notes)
        .fetch_optional(conn)
        .await
    }
}
