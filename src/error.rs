use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Validation(String),
    Conflict(String),
    RateLimited(String),
    Internal(String),
    Database(sqlx::Error),
}

/// Uniform response envelope: `{success, data?, error?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::Validation(msg) => write!(f, "Validation Error: {msg}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::RateLimited(msg) => write!(f, "Rate Limited: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

/// Postgres SQLSTATE for a value that does not fit its numeric column.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

impl AppError {
    /// Classify a failed INSERT/UPDATE. `label` names the entity in messages.
    pub fn from_write(err: sqlx::Error, label: &str) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("{label} not found")),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                let field = db_err
                    .constraint()
                    .map(constraint_field)
                    .unwrap_or_else(|| "value".to_string());
                AppError::Validation(format!("{label} with this {field} already exists"))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::Validation("Referenced record does not exist".to_string())
            }
            sqlx::Error::Database(ref db_err) if db_err.is_check_violation() => {
                let rule = db_err
                    .constraint()
                    .map(constraint_field)
                    .unwrap_or_else(|| "constraint".to_string());
                AppError::Validation(format!("Invalid {}: {rule}", label.to_lowercase()))
            }
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) =>
            {
                AppError::Validation(format!(
                    "Invalid {}: a numeric value is out of range",
                    label.to_lowercase()
                ))
            }
            _ => AppError::Database(err),
        }
    }

    /// Classify a failed DELETE: foreign-key references are a conflict.
    pub fn from_delete(err: sqlx::Error, label: &str) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::Conflict(format!(
                    "{label} is still referenced by other records"
                ))
            }
            _ => AppError::from_write(err, label),
        }
    }

    /// The user-facing message, without the category prefix.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::RateLimited(msg) => msg.clone(),
            AppError::Internal(_) | AppError::Database(_) => "Internal server error".to_string(),
        }
    }
}

/// `assets_serial_number_unique` -> `serial number`.
fn constraint_field(constraint: &str) -> String {
    let trimmed = constraint
        .strip_suffix("_unique")
        .unwrap_or(constraint);
    // Table names may themselves contain underscores, so match known prefixes.
    let field = TABLE_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);
    field.replace('_', " ")
}

const TABLE_PREFIXES: &[&str] = &[
    "license_assignments_",
    "status_labels_",
    "asset_models_",
    "manufacturers_",
    "maintenances_",
    "accessories_",
    "departments_",
    "categories_",
    "locations_",
    "suppliers_",
    "companies_",
    "licenses_",
    "assets_",
    "roles_",
    "users_",
];

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, axum::Json(ApiResponse::failure(self.message()))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Invalid query: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(format!("Invalid path: {}", rejection.body_text()))
    }
}
