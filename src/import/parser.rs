use axum::http::HeaderMap;
use serde_json::{Map, Value};

/// Rows as uploaded, before column mapping.
#[derive(Debug, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    /// One JSON value per data row; CSV rows are objects of strings.
    pub rows: Vec<Value>,
}

/// Parse an import body based on the Content-Type header.
/// `key` is the array key expected in JSON bodies (e.g. `assets`).
pub async fn parse_body(headers: &HeaderMap, body: bytes::Bytes, key: &str) -> Result<RawTable, String> {
    let ct = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json");

    if ct.contains("multipart/form-data") {
        let csv = read_multipart_file(headers, body).await?;
        parse_csv(&csv)
    } else if ct.contains("text/csv") || ct.contains("application/csv") {
        parse_csv(&body)
    } else {
        parse_json(&body, key)
    }
}

/// `{ "<key>": [ {...}, ... ] }`
pub fn parse_json(body: &[u8], key: &str) -> Result<RawTable, String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?;

    let Some(Value::Array(rows)) = value.get(key) else {
        return Err(format!("Expected `{key}` to be an array of rows"));
    };

    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        if let Some(obj) = row.as_object() {
            for k in obj.keys() {
                if !headers.contains(k) {
                    headers.push(k.clone());
                }
            }
        }
    }

    Ok(RawTable {
        headers,
        rows: rows.clone(),
    })
}

/// Header row plus data rows. Blank lines are skipped and do not count as rows.
pub fn parse_csv(data: &[u8]) -> Result<RawTable, String> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(data);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("Invalid CSV header: {e}"))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err("CSV file has no header row".to_string());
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format!("Invalid CSV at record {}: {e}", i + 1))?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let mut row = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), Value::String(cell.to_string()));
        }
        rows.push(Value::Object(row));
    }

    Ok(RawTable { headers, rows })
}

/// Pull the first file field (or the field named `file`) out of a multipart body.
async fn read_multipart_file(headers: &HeaderMap, body: bytes::Bytes) -> Result<Vec<u8>, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let is_file = field.file_name().is_some() || field.name() == Some("file");
        if !is_file {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        return Ok(bytes.to_vec());
    }

    Err("Multipart body contains no file".to_string())
}
