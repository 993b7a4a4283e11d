use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{Location, LocationInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("address", "address", "Address", FieldKind::Text),
    FieldDef::new("city", "city", "City", FieldKind::Text),
    FieldDef::new("state", "state", "State", FieldKind::Text),
    FieldDef::new("country", "country", "Country", FieldKind::Text),
    FieldDef::new("zip", "zip", "Zip", FieldKind::Text),
];

#[async_trait]
impl Entity for Location {
    const TABLE: &'static str = "locations";
    const KIND: &'static str = "LOCATION";
    const LABEL: &'static str = "Location";
    const PATH: &'static str = "locations";
    const PLURAL: &'static str = "locations";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = LocationInput;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &LocationInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Location>(
            "INSERT INTO locations (id, company_id, name, address, city, state, country, zip)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.country)
        .bind(&input.zip)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &LocationInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Location>(
            "UPDATE locations SET
                 name = COALESCE($3, name),
                 address = COALESCE($4, address),
                 city = COALESCE($5, city),
                 state = COALESCE($6, state),
                 country = COALESCE($7, country),
                 zip = COALESCE($8, zip),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.country)
        .bind(&input.zip)
        .fetch_optional(conn)
        .await
    }
}
