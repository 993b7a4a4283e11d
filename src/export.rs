use serde_json::Value;

use crate::entity::Entity;
use crate::error::AppError;

/// Export header: `id`, the declared fields, then the timestamps.
pub fn columns<E: Entity>() -> Vec<&'static str> {
    let mut columns = Vec::with_capacity(E::FIELDS.len() + 3);
    columns.push("id");
    columns.extend(E::FIELDS.iter().map(|f| f.name));
    columns.push("createdAt");
    columns.push("updatedAt");
    columns
}

pub fn to_csv<E: Entity>(rows: &[E]) -> Result<Vec<u8>, AppError> {
    let columns = columns::<E>();
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(&columns)
        .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;

    for row in rows {
        let value = serde_json::to_value(row)
            .map_err(|e| AppError::Internal(format!("Serialize failed: {e}")))?;
        let record = columns.iter().map(|c| cell(value.get(*c)));
        writer
            .write_record(record)
            .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {e}")))
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
