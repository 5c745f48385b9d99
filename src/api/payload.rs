// src/api/payload.rs - Typed parse of the stored result payload (`resultData`)
//
// The primary backend stores the analysis result as an opaque JSON string.
// The detail page needs `charts`, `statistics` (column -> stats) and
// `preview` ({columns, data}) out of it. Absent fields become empty
// collections; present fields of the wrong shape are a `PayloadError`.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Stored result is not valid JSON: {0}")]
    Malformed(String),

    #[error("Stored result is not a JSON object")]
    NotAnObject,

    #[error("Stored result field `{field}` should be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
}

/// A numeric or textual statistic, exactly as stored.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl StatValue {
    fn from_json(v: &Value) -> Option<Self> {
        match v {
            Value::Null => None,
            Value::Number(n) => n.as_f64().map(StatValue::Number),
            Value::String(s) => Some(StatValue::Text(s.clone())),
            other => Some(StatValue::Text(other.to_string())),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => Some(*n),
            StatValue::Text(_) => None,
        }
    }
}

/// Per-column statistics. Every field is optional; only present ones render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStats {
    pub data_type: Option<String>,
    pub count: Option<StatValue>,
    pub unique: Option<StatValue>,
    pub missing: Option<StatValue>,
    pub mean: Option<StatValue>,
    pub std: Option<StatValue>,
    pub min: Option<StatValue>,
    pub max: Option<StatValue>,
    pub p25: Option<StatValue>,
    pub p50: Option<StatValue>,
    pub p75: Option<StatValue>,
    pub top: Option<StatValue>,
}

impl ColumnStats {
    fn from_object(obj: &Map<String, Value>) -> Self {
        let get = |key: &str| obj.get(key).and_then(StatValue::from_json);
        Self {
            data_type: obj
                .get("data_type")
                .or_else(|| obj.get("dtype"))
                .and_then(Value::as_str)
                .map(str::to_string),
            count: get("count"),
            unique: get("unique"),
            missing: get("missing"),
            mean: get("mean"),
            std: get("std"),
            min: get("min"),
            max: get("max"),
            p25: get("25%"),
            p50: get("50%"),
            p75: get("75%"),
            top: get("top"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadChart {
    pub chart_type: String,
    pub title: String,
    /// As stored: relative (`/api/...`) or absolute.
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisPayload {
    pub charts: Vec<PayloadChart>,
    /// Column name -> stats, in the order the payload lists them.
    pub statistics: Vec<(String, ColumnStats)>,
    pub preview: Preview,
}

impl AnalysisPayload {
    /// Parse a stored payload. `None` (no payload stored) yields an empty one.
    pub fn parse_optional(raw: Option<&str>) -> Result<Self, PayloadError> {
        match raw {
            Some(s) if !s.trim().is_empty() => Self::parse(s),
            _ => Ok(Self::default()),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| PayloadError::Malformed(e.to_string()))?;
        // Tolerate one level of string wrapping, as the upload path does.
        let value = match value {
            Value::String(inner) => serde_json::from_str(&inner)
                .map_err(|e| PayloadError::Malformed(e.to_string()))?,
            v => v,
        };
        let obj = value.as_object().ok_or(PayloadError::NotAnObject)?;

        Ok(Self {
            charts: parse_charts(obj.get("charts"))?,
            statistics: parse_statistics(obj.get("statistics"))?,
            preview: parse_preview(obj.get("preview"))?,
        })
    }
}

fn invalid(field: &str, expected: &'static str) -> PayloadError {
    PayloadError::InvalidField {
        field: field.to_string(),
        expected,
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn parse_charts(v: Option<&Value>) -> Result<Vec<PayloadChart>, PayloadError> {
    let items = match v {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(invalid("charts", "an array")),
    };
    items
        .iter()
        .map(|item| {
            let obj = item
                .as_object()
                .ok_or_else(|| invalid("charts[]", "an object"))?;
            Ok(PayloadChart {
                chart_type: str_field(obj, "chart_type")
                    .or_else(|| str_field(obj, "type"))
                    .unwrap_or_default(),
                title: str_field(obj, "title").unwrap_or_default(),
                url: str_field(obj, "url").unwrap_or_default(),
            })
        })
        .collect()
}

fn parse_statistics(v: Option<&Value>) -> Result<Vec<(String, ColumnStats)>, PayloadError> {
    match v {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(column, stats)| {
                let obj = stats
                    .as_object()
                    .ok_or_else(|| invalid(&format!("statistics.{column}"), "an object"))?;
                Ok((column.clone(), ColumnStats::from_object(obj)))
            })
            .collect(),
        // The analysis backend's own shape: a list of records with `column_name`.
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                let obj = item
                    .as_object()
                    .ok_or_else(|| invalid("statistics[]", "an object"))?;
                let column = str_field(obj, "column_name")
                    .ok_or_else(|| invalid("statistics[].column_name", "a string"))?;
                Ok((column, ColumnStats::from_object(obj)))
            })
            .collect(),
        Some(_) => Err(invalid("statistics", "an object keyed by column")),
    }
}

fn parse_preview(v: Option<&Value>) -> Result<Preview, PayloadError> {
    let obj = match v {
        None | Some(Value::Null) => return Ok(Preview::default()),
        Some(Value::Object(obj)) => obj,
        Some(_) => return Err(invalid("preview", "an object")),
    };

    let columns = match obj.get("columns") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(cols)) => cols
            .iter()
            .map(|c| match c {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(_) => return Err(invalid("preview.columns", "an array")),
    };

    let rows = match obj.get("data") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(rows)) => rows
            .iter()
            .map(|r| {
                r.as_object()
                    .cloned()
                    .ok_or_else(|| invalid("preview.data[]", "an object"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(invalid("preview.data", "an array")),
    };

    Ok(Preview { columns, rows })
}
