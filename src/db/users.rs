use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::auth::password;
use crate::entity::Entity;
use crate::import::fields::{FieldDef, FieldKind};
use crate::models::user::USER_STATUSES;
use crate::models::{User, UserInput};

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
    FieldDef::new("email", "email", "Email", FieldKind::Email).required(),
    FieldDef::new("employeeId", "employee_id", "Employee ID", FieldKind::Text),
    FieldDef::new("title", "title", "Title", FieldKind::Text),
    FieldDef::new("roleId", "role_id", "Role", FieldKind::Reference),
    FieldDef::new("departmentId", "department_id", "Department", FieldKind::Reference),
    FieldDef::new("locationId", "location_id", "Location", FieldKind::Reference),
    FieldDef::new("status", "status", "Status", FieldKind::Choice(USER_STATUSES)),
];

#[async_trait]
impl Entity for User {
    const TABLE: &'static str = "users";
    const KIND: &'static str = "USER";
    const LABEL: &'static str = "User";
    const PATH: &'static str = "users";
    const PLURAL: &'static str = "users";
    const FIELDS: &'static [FieldDef] = FIELDS;

    type Input = UserInput;

    fn id(&self) -> Uuid {
        self.id
    }

    /// Emails compare case-insensitively; a plaintext password is replaced by its hash.
    fn normalize(input: &mut UserInput, _creating: bool) -> Result<(), String> {
        if let Some(email) = input.email.as_mut() {
            *email = email.trim().to_lowercase();
        }
        if let Some(employee_id) = input.employee_id.as_mut() {
            *employee_id = employee_id.trim().to_string();
        }
        if let Some(plain) = input.password.take() {
            password::check_strength(&plain)?;
            input.password_hash = Some(password::hash(&plain)?);
        }
        Ok(())
    }

    async fn insert(
        conn: &mut PgConnection,
        company_id: Uuid,
        input: &UserInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, company_id, name, email, employee_id, title, role_id,
                 department_id, location_id, status, password_hash)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'active'), $11)
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.employee_id)
        .bind(&input.title)
        .bind(input.role_id)
        .bind(input.department_id)
        .bind(input.location_id)
        .bind(&input.status)
        .bind(&input.password_hash)
        .fetch_one(conn)
        .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Uuid,
        input: &UserInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET
                 name = COALESCE($3, name),
                 email = COALESCE($4, email),
                 employee_id = COALESCE($5, employee_id),
                 title = COALESCE($6, title),
                 role_id = COALESCE($7, role_id),
                 department_id = COALESCE($8, department_id),
                 location_id = COALESCE($9, location_id),
                 status = COALESCE($10, status),
                 password_hash = COALESCE($11, password_hash),
                 updated_at = now()
             WHERE id = $1 AND company_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.employee_id)
        .bind(&input.title)
        .bind(input.role_id)
        .bind(input.department_id)
        .bind(input.location_id)
        .bind(&input.status)
        .bind(&input.password_hash)
        .fetch_optional(conn)
        .await
    }
}

pub async fn find_by_email(
    pool: &PgPool,
    company_id: Uuid,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE company_id = $1 AND email = $2")
        .bind(company_id)
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
