use serde::Serialize;
use serde_json::Value;
use sqlx::{Connection, PgPool};
use uuid::Uuid;

use crate::entity::{self, Entity};
use crate::error::AppError;

use super::mapping;
use super::parser::RawTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    /// 1-based index among the uploaded data rows.
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    fn new(success_count: usize, mut errors: Vec<RowError>) -> Self {
        errors.sort_by_key(|e| e.row);
        Self {
            success_count,
            error_count: errors.len(),
            errors,
        }
    }
}

/// A row that passed coercion and validation and is ready to insert.
#[derive(Debug)]
pub struct PreparedRow<I> {
    pub row: usize,
    pub input: I,
}

#[derive(Debug)]
pub struct Prepared<I> {
    pub rows: Vec<PreparedRow<I>>,
    pub errors: Vec<RowError>,
}

/// Map, coerce and validate every row without touching the database.
///
/// Fails as a whole only for pre-flight problems: too many rows, or a
/// required field that no column maps to.
pub fn prepare<E: Entity>(table: RawTable, max_rows: usize) -> Result<Prepared<E::Input>, AppError> {
    if table.rows.len() > max_rows {
        return Err(AppError::Validation(format!(
            "Import is limited to {max_rows} rows, got {}",
            table.rows.len()
        )));
    }

    if table.rows.is_empty() {
        return Ok(Prepared {
            rows: Vec::new(),
            errors: Vec::new(),
        });
    }

    let columns = mapping::map_columns(&table.headers, E::FIELDS).map_err(|missing| {
        AppError::Validation(format!("Missing required columns: {}", missing.join(", ")))
    })?;

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (i, raw) in table.rows.into_iter().enumerate() {
        let row = i + 1;
        let mut fail = |message: String| errors.push(RowError { row, message });

        let Value::Object(raw) = raw else {
            fail("Row must be an object".to_string());
            continue;
        };

        let mut mapped = match columns.apply(&raw) {
            Ok(mapped) => mapped,
            Err(cell_errors) => {
                fail(cell_errors.join("; "));
                continue;
            }
        };
        // Absent cells take the column default.
        mapped.retain(|_, v| !v.is_null());

        let mut input: E::Input = match serde_json::from_value(Value::Object(mapped)) {
            Ok(input) => input,
            Err(e) => {
                fail(format!("Invalid row: {e}"));
                continue;
            }
        };

        if let Err(message) = entity::validate_input::<E>(&mut input, true) {
            fail(message);
            continue;
        }

        rows.push(PreparedRow { row, input });
    }

    Ok(Prepared { rows, errors })
}

/// Insert prepared rows in one transaction, each under its own savepoint so
/// that a failing row rolls back alone.
pub async fn run<E: Entity>(
    pool: &PgPool,
    company_id: Uuid,
    prepared: Prepared<E::Input>,
) -> Result<ImportReport, AppError> {
    let Prepared { rows, mut errors } = prepared;
    let mut success_count = 0;

    let mut tx = pool.begin().await?;

    for PreparedRow { row, input } in rows {
        let mut savepoint = Connection::begin(&mut *tx).await?;
        match E::insert(&mut savepoint, company_id, &input).await {
            Ok(_) => {
                savepoint.commit().await?;
                success_count += 1;
            }
            Err(e) => {
                savepoint.rollback().await?;
                let err = AppError::from_write(e, E::LABEL);
                if let AppError::Database(ref db_err) = err {
                    tracing::error!("Import of {} row {row} failed: {db_err}", E::TABLE);
                }
                errors.push(RowError {
                    row,
                    message: err.message(),
                });
            }
        }
    }

    tx.commit().await?;

    Ok(ImportReport::new(success_count, errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parser::parse_csv;
    use crate::models::{Asset, User};

    fn asset_csv() -> String {
        let mut csv = String::from("Name,Serial Number,Purchase Price,Purchase Date,Requestable\n");
        for i in 1..=10 {
            match i {
                4 => csv.push_str("Laptop 4,,100,2024-01-01,yes\n"),
                7 => csv.push_str("Laptop 7,SN-7,cheap,2024-01-01,no\n"),
                _ => csv.push_str(&format!("Laptop {i},SN-{i},1299.00,2024-01-0{},\n", i % 9 + 1)),
            }
        }
        csv
    }

    #[test]
    fn invalid_rows_are_reported_and_skipped() {
        let table = parse_csv(asset_csv().as_bytes()).unwrap();
        let prepared = prepare::<Asset>(table, 100).unwrap();

        assert_eq!(prepared.rows.len(), 8);
        let failed: Vec<usize> = prepared.errors.iter().map(|e| e.row).collect();
        assert_eq!(failed, vec![4, 7]);
        assert!(prepared.errors[0].message.contains("Serial Number"));
        assert!(prepared.errors[1].message.starts_with("Purchase Price:"));
    }

    #[test]
    fn prepared_rows_keep_their_index_and_values() {
        let table = parse_csv(asset_csv().as_bytes()).unwrap();
        let prepared = prepare::<Asset>(table, 100).unwrap();

        let first = &prepared.rows[0];
        assert_eq!(first.row, 1);
        assert_eq!(first.input.serial_number.as_deref(), Some("SN-1"));
        assert_eq!(first.input.requestable, None);
        assert_eq!(prepared.rows[2].row, 3);
        assert_eq!(prepared.rows[3].row, 5);
    }

    #[test]
    fn missing_required_column_is_a_preflight_error() {
        let table = parse_csv(b"Name,Notes\nLaptop,x\n").unwrap();
        let err = prepare::<Asset>(table, 100).unwrap_err();

        match err {
            AppError::Validation(msg) => assert!(msg.contains("Serial Number"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn row_cap_is_enforced() {
        let table = parse_csv(asset_csv().as_bytes()).unwrap();
        assert!(matches!(prepare::<Asset>(table, 5), Err(AppError::Validation(_))));
    }

    #[test]
    fn empty_upload_prepares_nothing() {
        let table = parse_csv(b"Name,Serial Number\n").unwrap();
        let prepared = prepare::<Asset>(table, 100).unwrap();
        assert!(prepared.rows.is_empty());
        assert!(prepared.errors.is_empty());
    }

    #[test]
    fn entity_rules_apply_to_imported_rows() {
        let table = parse_csv(b"name,email,status\nAda,ADA@Example.com,Active\nBob,not-an-email,active\n").unwrap();
        let prepared = prepare::<User>(table, 100).unwrap();

        assert_eq!(prepared.rows.len(), 1);
        assert_eq!(prepared.rows[0].input.email.as_deref(), Some("ada@example.com"));
        assert_eq!(prepared.rows[0].input.status.as_deref(), Some("active"));
        assert_eq!(prepared.errors[0].row, 2);
    }

    #[test]
    fn report_sorts_errors_by_row() {
        let report = ImportReport::new(
            3,
            vec![
                RowError { row: 9, message: "a".into() },
                RowError { row: 2, message: "b".into() },
            ],
        );
        assert_eq!(report.error_count, 2);
        assert_eq!(report.errors[0].row, 2);
    }
}
