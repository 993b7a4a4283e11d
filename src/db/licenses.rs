use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::{License, LicenseAssignment, LicenseInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("licenseKey", "license_key", "License Key", FieldKind::Text),
    FieldDef::new("seats", "seats", "Seats", FieldKind::Integer).required(),
    FieldDef::new("categoryId", "category_id", "Category", FieldKind::Reference),
    FieldDef::new("manufacturerId", "manufacturer_id", "Manufacturer", FieldKind::Reference),
    FieldDef::new("supplierId", "supplier_id", "Supplier", FieldKind::Reference),
    FieldDef::new("purchasePrice", "purchase_price", "Purchase Price", FieldKind::Decimal),
    FieldDef::new("purchaseDate", "purchase_date", "Purchase Date", FieldKind::Date),
    FieldDef::new("renewalDate", "renewal_date", "Renewal Date", FieldKind::Date),
    FieldDef::new("reorderThreshold", "reorder_threshold", "Reorder Threshold", FieldKind::Integer),
    FieldDef::new("licensedToEmail", "licensed_to_email", "Licensed To Email", FieldKind::Email),
    FieldDef::new("notes", "notes", "Notes", FieldKind::Text),
];

#[async_trait]
impl Entity for License {
    const TABLE: &'static str = "licenses";
    const KIND: &'static str = "LICENSE";
    const LABEL: &'static str = "License";
    const PATH: &'static str = "licenses";
    const PLURAL: &'static str = "licenses";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = LicenseInput;

    fn id(&self) -> Uuid {
        self.id
    }

    fn normalize(input: &mut LicenseInput, _creating: bool) -> Result<(), String> {
        if input.seats.is_some_and(|s| s < 1) {
            return Err("Seats must be at least 1".to_string());
        }
        Ok(())
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &LicenseInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, License>(
            "INSERT INTO licenses (id, company_id, name, license_key, seats, category_id,
                 manufacturer_id, supplier_id, purchase_price, purchase_date, renewal_date,
                 reorder_threshold, licensed_to_email, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.license_key)
        .bind(input.seats)
        .bind(input.category_id)
        .bind(input.manufacturer_id)
        .bind(input.supplier_id)
        .bind(input.purchase_price)
        .bind(input.purchase_date)
        .bind(input.renewal_date)
        .bind(input.reorder_threshold)
        .bind(&input.licensed_to_email)
        .bind(&input.notes)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &LicenseInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, License>(
            "UPDATE licenses SET
                 name = COALESCE($3, name),
                 license_key = COALESCE($4, license_key),
                 seats = COALESCE($5, seats),
                 category_id = COALESCE($6, category_id),
                 manufacturer_id = COALESCE($7, manufacturer_id),
                 supplier_id = COALESCE($8, supplier_id),
                 purchase_price = COALESCE($9, purchase_price),
                 purchase_date = COALESCE($10, purchase_date),
                 renewal_date = COALESCE($11, renewal_date),
                 reorder_threshold = COALESCE($12, reorder_threshold),
                 licensed_to_email = COALESCE($13, licensed_to_email),
                 notes = COALESCE($14, notes),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.license_key)
        .bind(input.seats)
        .bind(input.category_id)
        .bind(input.manufacturer_id)
        .bind(input.supplier_id)
        .bind(input.purchase_price)
        .bind(input.purchase_date)
        .bind(input.renewal_date)
        .bind(input.reorder_threshold)
        .bind(&input.licensed_to_email)
        .bind(&input.notes)
        .fetch_optional(conn)
        .await
    }
}

/// Take one seat. Returns false when the license is full or not in the tenant.
/// The row lock taken by the UPDATE serializes concurrent allocations.
pub async fn allocate_seat(
    conn: &mut PgConnection,
    license_id: Uuid,
    company_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE licenses SET seats_allocated = seats_allocated + 1, updated_at = now()
         WHERE id = $1 AND company_id = $2 AND seats_allocated < seats",
    )
    .bind(license_id)
    .bind(company_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn free_seat(
    conn: &mut PgConnection,
    license_id: Uuid,
    company_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE licenses SET seats_allocated = seats_allocated - 1, updated_at = now()
         WHERE id = $1 AND company_id = $2 AND seats_allocated > 0",
    )
    .bind(license_id)
    .bind(company_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn create_assignment(
    conn: &mut PgConnection,
    license_id: Uuid,
    company_id: Uuid,
    user_id: Uuid,
) -> Result<LicenseAssignment, sqlx::Error> {
    sqlx::query_as::<_, LicenseAssignment>(
        "INSERT INTO license_assignments (id, company_id, license_id, user_id)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(company_id)
    .bind(license_id)
    .bind(user_id)
    .fetch_one(conn)
    .await
}

pub async fn delete_assignment(
    conn: &mut PgConnection,
    license_id: Uuid,
    company_id: Uuid,
    user_id: Uuid,
) -> Result<Option<LicenseAssignment>, sqlx::Error> {
    sqlx::query_as::<_, LicenseAssignment>(
        "DELETE FROM license_assignments
         WHERE license_id = $1 AND company_id = $2 AND user_id = $3
         RETURNING *",
    )
    .bind(license_id)
    .bind(company_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

pub async fn list_assignments(
    pool: &PgPool,
    license_id: Uuid,
    company_id: Uuid,
) -> Result<Vec<LicenseAssignment>, sqlx::Error> {
    sqlx::query_as::<_, LicenseAssignment>(
        "SELECT * FROM license_assignments
         WHERE license_id = $1 AND company_id = $2
         ORDER BY assigned_at, id",
    )
    .bind(license_id)
    .bind(company_id)
    .fetch_all(pool)
    .await
}

/// Licenses whose free seats have dropped to their reorder threshold.
pub async fn list_reorder(pool: &PgPool, company_id: Uuid) -> Result<Vec<License>, sqlx::Error> {
    sqlx::query_as::<_, License>(
        "SELECT * FROM licenses
         WHERE company_id = $1
           AND reorder_threshold IS NOT NULL
           AND seats - seats_allocated <= reorder_threshold
         ORDER BY seats - seats_allocated, name",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
}
