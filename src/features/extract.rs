//! Record Extraction
//!
//! Turns a batch of raw traffic records into a RawMatrix whose columns align
//! 1:1 with the FeatureSpec field order.
//!
//! Default policy for absent fields (JSON `null` counts as absent):
//! numeric → 0.0, categorical → the field's sentinel (last) bucket value.
//! A categorical value outside the allowed set also maps to the sentinel.
//! Malformed values in numeric columns are an error, never a silent zero.

use serde_json::Value;

use super::matrix::{RawMatrix, RawRecord, RawValue};
use super::schema::{FeatureSpec, FieldKind, FieldSpec};
use crate::error::DetectionError;

/// Extract one raw cell per record and spec field
pub fn extract_from_records(
    records: &[RawRecord],
    spec: &FeatureSpec,
) -> Result<RawMatrix, DetectionError> {
    let mut matrix = RawMatrix::new(records.len(), spec.len());

    for (row, record) in records.iter().enumerate() {
        for (col, field) in spec.fields().iter().enumerate() {
            let cell = extract_cell(row, field, record.get(&field.name))?;
            matrix.set(row, col, cell);
        }
    }

    Ok(matrix)
}

fn extract_cell(
    row: usize,
    field: &FieldSpec,
    value: Option<&Value>,
) -> Result<RawValue, DetectionError> {
    match &field.kind {
        FieldKind::Numeric => extract_numeric(row, field, value),
        FieldKind::Categorical { values } => Ok(extract_categorical(values, value)),
    }
}

fn extract_numeric(
    row: usize,
    field: &FieldSpec,
    value: Option<&Value>,
) -> Result<RawValue, DetectionError> {
    match value {
        None | Some(Value::Null) => Ok(RawValue::Num(0.0)),
        Some(Value::Number(n)) => Ok(RawValue::Num(n.as_f64().unwrap_or(0.0) as f32)),
        Some(Value::String(s)) => match s.trim().parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(RawValue::Num(v)),
            _ => Err(DetectionError::FeatureConversion {
                row,
                field: field.name.clone(),
                value: s.clone(),
            }),
        },
        Some(other) => Err(DetectionError::FeatureConversion {
            row,
            field: field.name.clone(),
            value: other.to_string(),
        }),
    }
}

fn extract_categorical(allowed: &[String], value: Option<&Value>) -> RawValue {
    let sentinel = allowed.last().cloned().unwrap_or_default();
    match value {
        Some(Value::String(s)) if allowed.iter().any(|v| v == s) => {
            RawValue::Text(s.clone())
        }
        // Absent, unknown, or non-string values fall into the sentinel bucket
        _ => RawValue::Text(sentinel),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_spec() -> FeatureSpec {
        FeatureSpec::new(vec![
            FieldSpec::numeric("duration"),
            FieldSpec::categorical("protocol_type", &["tcp", "udp", "icmp"]),
            FieldSpec::numeric("src_bytes"),
        ])
    }

    fn record(value: serde_json::Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_extract_aligned_with_spec_order() {
        let records = vec![record(json!({
            "duration": 3.5,
            "protocol_type": "udp",
            "src_bytes": 120
        }))];
        let m = extract_from_records(&records, &test_spec()).unwrap();
        assert_eq!(m.get(0, 0).as_num(), Some(3.5));
        assert_eq!(m.get(0, 1).as_text(), Some("udp"));
        assert_eq!(m.get(0, 2).as_num(), Some(120.0));
    }

    #[test]
    fn test_absent_numeric_defaults_to_zero() {
        let records = vec![record(json!({ "protocol_type": "tcp" }))];
        let m = extract_from_records(&records, &test_spec()).unwrap();
        assert_eq!(m.get(0, 0).as_num(), Some(0.0));
        assert_eq!(m.get(0, 2).as_num(), Some(0.0));
    }

    #[test]
    fn test_absent_categorical_defaults_to_sentinel() {
        let records = vec![record(json!({ "duration": 1 }))];
        let m = extract_from_records(&records, &test_spec()).unwrap();
        assert_eq!(m.get(0, 1).as_text(), Some("icmp"));
    }

    #[test]
    fn test_unknown_categorical_maps_to_sentinel() {
        let records = vec![record(json!({ "protocol_type": "sctp" }))];
        let m = extract_from_records(&records, &test_spec()).unwrap();
        assert_eq!(m.get(0, 1).as_text(), Some("icmp"));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let records = vec![record(json!({ "duration": null }))];
        let m = extract_from_records(&records, &test_spec()).unwrap();
        assert_eq!(m.get(0, 0).as_num(), Some(0.0));
    }

    #[test]
    fn test_numeric_string_is_parsed() {
        let records = vec![record(json!({ "duration": "42.5" }))];
        let m = extract_from_records(&records, &test_spec()).unwrap();
        assert_eq!(m.get(0, 0).as_num(), Some(42.5));
    }

    #[test]
    fn test_malformed_numeric_fails_with_row_and_field() {
        let records = vec![
            record(json!({ "duration": 1 })),
            record(json!({ "src_bytes": "lots" })),
        ];
        let err = extract_from_records(&records, &test_spec()).unwrap_err();
        match err {
            DetectionError::FeatureConversion { row, field, value } => {
                assert_eq!(row, 1);
                assert_eq!(field, "src_bytes");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_scalar_numeric_fails() {
        let records = vec![record(json!({ "duration": [1, 2] }))];
        assert!(extract_from_records(&records, &test_spec()).is_err());
    }
}
