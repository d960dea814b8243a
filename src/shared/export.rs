//! CSV/JSON export helpers shared by list endpoints.

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Serialize flat rows as CSV with a header row
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))
}

pub fn to_json<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(rows)
        .map_err(|e| AppError::Internal(format!("JSON serialization failed: {}", e)))
}

pub fn export_filename(entity: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}-{}.{}",
        entity,
        date.format("%Y%m%d"),
        format.extension()
    )
}

/// Build a download response for `rows` in the requested format
pub fn export_response<T: Serialize>(
    entity: &str,
    format: ExportFormat,
    rows: &[T],
) -> Result<Response> {
    let body = match format {
        ExportFormat::Csv => to_csv(rows)?,
        ExportFormat::Json => to_json(rows)?,
    };

    let filename = export_filename(entity, format, Utc::now().date_naive());
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| AppError::Internal(format!("Invalid export filename: {}", e)))?;

    tracing::info!(
        "Exported {} {} rows as {}",
        rows.len(),
        entity,
        format.extension()
    );

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(format.content_type()),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        id: u32,
        name: String,
        parent: Option<u32>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                name: "Shoes".to_string(),
                parent: None,
            },
            Row {
                id: 2,
                name: "Running, Trail".to_string(),
                parent: Some(1),
            },
        ]
    }

    #[test]
    fn test_csv_has_header_and_quotes_commas() {
        let csv = String::from_utf8(to_csv(&rows()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,name,parent");
        assert_eq!(lines[1], "1,Shoes,");
        assert_eq!(lines[2], "2,\"Running, Trail\",1");
    }

    #[test]
    fn test_csv_of_empty_rows_is_empty() {
        assert!(to_csv::<Row>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_json_export_is_array() {
        let value: serde_json::Value = serde_json::from_slice(&to_json(&rows()).unwrap()).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(2));
        assert_eq!(value[1]["parent"], 1);
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            export_filename("orders", ExportFormat::Csv, date),
            "orders-20240309.csv"
        );
        assert_eq!(
            export_filename("categories", ExportFormat::Json, date),
            "categories-20240309.json"
        );
    }

    #[test]
    fn test_export_response_headers() {
        let response = export_response("categories", ExportFormat::Json, &rows()).unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"categories-"));
        assert!(disposition.ends_with(".json\""));
    }
}
