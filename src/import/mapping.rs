use serde_json::{Map, Value};

use super::fields::{self, FieldDef};

/// Source column -> declared field, produced by [`map_columns`].
#[derive(Debug)]
pub struct ColumnMap<'f> {
    columns: Vec<(String, &'f FieldDef)>,
}

/// Lowercase and drop everything but letters and digits, so that
/// `serialNumber`, `Serial Number` and `serial_number` compare equal.
fn normalize(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Match source headers against the declared fields by name or label.
/// Unmatched headers are dropped. Returns the labels of unmatched required
/// fields as the error.
pub fn map_columns<'f>(
    headers: &[String],
    fields: &'f [FieldDef],
) -> Result<ColumnMap<'f>, Vec<&'static str>> {
    let mut columns: Vec<(String, &'f FieldDef)> = Vec::new();

    for header in headers {
        let key = normalize(header);
        if key.is_empty() {
            continue;
        }
        let Some(def) = fields
            .iter()
            .find(|f| normalize(f.name) == key || normalize(f.label) == key)
        else {
            continue;
        };
        // First matching column wins.
        if columns.iter().any(|(_, d)| d.name == def.name) {
            continue;
        }
        columns.push((header.clone(), def));
    }

    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|f| f.required && !columns.iter().any(|(_, d)| d.name == f.name))
        .map(|f| f.label)
        .collect();

    if missing.is_empty() {
        Ok(ColumnMap { columns })
    } else {
        Err(missing)
    }
}

impl ColumnMap<'_> {
    /// Build the entity-shaped JSON object for one raw row, coercing each
    /// mapped cell. Every failing cell is reported.
    pub fn apply(&self, raw: &Map<String, Value>) -> Result<Map<String, Value>, Vec<String>> {
        let mut out = Map::new();
        let mut errors = Vec::new();

        for (source, def) in &self.columns {
            let cell = raw.get(source).unwrap_or(&Value::Null);
            match fields::coerce(cell, def.kind) {
                Ok(value) => {
                    out.insert(def.name.to_string(), value);
                }
                Err(e) => errors.push(format!("{}: {e}", def.label)),
            }
        }

        if errors.is_empty() { Ok(out) } else { Err(errors) }
    }

    pub fn mapped_fields(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, d)| d.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::fields::FieldKind;
    use serde_json::json;

    const FIELDS: &[FieldDef] = &[
        FieldDef::new("name", "name", "Name", FieldKind::Text).required(),
        FieldDef::new("serialNumber", "serial_number", "Serial Number", FieldKind::Text).required(),
        FieldDef::new("purchasePrice", "purchase_price", "Purchase Price", FieldKind::Decimal),
    ];

    fn headers(h: &[&str]) -> Vec<String> {
        h.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matches_name_or_label_case_insensitively() {
        let map = map_columns(&headers(&["NAME", "Serial Number", "purchase_price"]), FIELDS).unwrap();
        let mapped: Vec<&str> = map.mapped_fields().collect();
        assert_eq!(mapped, vec!["name", "serialNumber", "purchasePrice"]);
    }

    #[test]
    fn unmatched_columns_are_dropped() {
        let map = map_columns(&headers(&["id", "name", "serialnumber", "createdAt"]), FIELDS).unwrap();
        let row = json!({ "id": "x", "name": "Laptop", "serialnumber": "SN1", "createdAt": "y" });
        let out = map.apply(row.as_object().unwrap()).unwrap();

        assert_eq!(Value::Object(out), json!({ "name": "Laptop", "serialNumber": "SN1" }));
    }

    #[test]
    fn missing_required_fields_block_import() {
        let err = map_columns(&headers(&["name", "notes"]), FIELDS).unwrap_err();
        assert_eq!(err, vec!["Serial Number"]);
    }

    #[test]
    fn first_duplicate_column_wins() {
        let map = map_columns(&headers(&["name", "Name", "serial number"]), FIELDS).unwrap();
        let row = json!({ "name": "First", "Name": "Second", "serial number": "SN" });
        let out = map.apply(row.as_object().unwrap()).unwrap();

        assert_eq!(out["name"], json!("First"));
    }

    #[test]
    fn cell_errors_name_the_field() {
        let map = map_columns(&headers(&["name", "serial number", "purchase price"]), FIELDS).unwrap();
        let row = json!({ "name": "A", "serial number": "B", "purchase price": "lots" });
        let errors = map.apply(row.as_object().unwrap()).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Purchase Price:"));
    }
}
