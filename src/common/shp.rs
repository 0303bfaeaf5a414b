use std::{fs, path::Path};

use shapefile::{dbase::{FieldValue, Record}, Reader, Shape};

use crate::error::LoadError;

/// Reads all shapes + attribute records from a given `.shp` file path.
pub(crate) fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>, LoadError> {
    if !path.is_file() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }
    let shapefile_err = |source| LoadError::Shapefile { path: path.to_path_buf(), source };

    let mut reader = Reader::from_path(path).map_err(shapefile_err)?;
    let mut items = Vec::with_capacity(reader.shape_count().map_err(shapefile_err)?);
    for result in reader.iter_shapes_and_records() {
        items.push(result.map_err(shapefile_err)?);
    }
    Ok(items)
}

/// Contents of the `.prj` sidecar next to a `.shp`, if present.
pub(crate) fn read_prj(path: &Path) -> Option<String> {
    fs::read_to_string(path.with_extension("prj")).ok()
}

/// Why an identifier could not be taken from a record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldError {
    Missing,
    Invalid(String),
}

impl FieldError {
    /// Attach the file, record and field the error came from.
    pub(crate) fn at(self, path: &Path, row: usize, field: &str) -> LoadError {
        match self {
            FieldError::Missing => LoadError::MissingField {
                path: path.to_path_buf(), row, field: field.to_string(),
            },
            FieldError::Invalid(value) => LoadError::InvalidField {
                path: path.to_path_buf(), row, field: field.to_string(), value,
            },
        }
    }
}

/// Get an integer identifier, accepting numeric fields with no fractional part and digit strings.
pub(crate) fn integer_field(record: &Record, field: &str) -> Result<i64, FieldError> {
    fn from_float(n: f64) -> Result<i64, FieldError> {
        if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            Ok(n as i64)
        } else {
            Err(FieldError::Invalid(n.to_string()))
        }
    }

    match record.get(field) {
        None => Err(FieldError::Missing),
        Some(FieldValue::Integer(n)) => Ok(i64::from(*n)),
        Some(FieldValue::Numeric(Some(n))) | Some(FieldValue::Double(n)) => from_float(*n),
        Some(FieldValue::Float(Some(n))) => from_float(f64::from(*n)),
        Some(FieldValue::Character(Some(s))) => {
            let s = s.trim();
            if s.is_empty() { return Err(FieldError::Missing) }
            s.parse().map_err(|_| FieldError::Invalid(s.to_string()))
        }
        Some(FieldValue::Numeric(None)) | Some(FieldValue::Float(None)) | Some(FieldValue::Character(None)) => {
            Err(FieldError::Missing)
        }
        Some(other) => Err(FieldError::Invalid(format!("{other:?}"))),
    }
}

/// Get a textual identifier. Integral numeric values are rendered without a decimal part.
pub(crate) fn text_field(record: &Record, field: &str) -> Result<String, FieldError> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(FieldValue::Character(_)) => Err(FieldError::Missing),
        _ => integer_field(record, field).map(|n| n.to_string()),
    }
}

/// Get an optional label; anything other than a non-empty character value counts as absent.
pub(crate) fn label_field(record: &Record, field: &str) -> Option<String> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(field: &str, value: FieldValue) -> Record {
        let mut record = Record::default();
        record.insert(field.to_string(), value);
        record
    }

    #[test]
    fn integer_identifiers_from_numeric_and_text() {
        assert_eq!(integer_field(&record("id", FieldValue::Numeric(Some(241.0))), "id"), Ok(241));
        assert_eq!(integer_field(&record("id", FieldValue::Integer(12)), "id"), Ok(12));
        assert_eq!(integer_field(&record("id", FieldValue::Character(Some(" 56 ".into()))), "id"), Ok(56));
    }

    #[test]
    fn integer_identifier_errors() {
        assert_eq!(integer_field(&Record::default(), "id"), Err(FieldError::Missing));
        assert_eq!(integer_field(&record("id", FieldValue::Numeric(None)), "id"), Err(FieldError::Missing));
        assert!(matches!(
            integer_field(&record("id", FieldValue::Numeric(Some(1.5))), "id"),
            Err(FieldError::Invalid(_)),
        ));
        assert!(matches!(
            integer_field(&record("id", FieldValue::Character(Some("abc".into()))), "id"),
            Err(FieldError::Invalid(_)),
        ));
    }

    #[test]
    fn text_identifiers_keep_leading_zeros() {
        assert_eq!(
            text_field(&record("ct", FieldValue::Character(Some("0001000".into()))), "ct"),
            Ok("0001000".to_string()),
        );
        assert_eq!(text_field(&record("ct", FieldValue::Numeric(Some(1000100.0))), "ct"), Ok("1000100".to_string()));
        assert_eq!(text_field(&record("ct", FieldValue::Character(Some("  ".into()))), "ct"), Err(FieldError::Missing));
    }

    #[test]
    fn labels_are_optional() {
        assert_eq!(label_field(&record("zone", FieldValue::Character(Some("JFK Airport".into()))), "zone"),
            Some("JFK Airport".to_string()));
        assert_eq!(label_field(&Record::default(), "zone"), None);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_shapefile(&dir.path().join("absent.shp"));
        assert!(matches!(result, Err(LoadError::Missing(_))));
    }

    #[test]
    fn field_errors_carry_location() {
        let err = FieldError::Missing.at(Path::new("zones.shp"), 3, "LocationID");
        assert!(matches!(err, LoadError::MissingField { row: 3, .. }));
        assert_eq!(err.to_string(), "zones.shp: record 3 is missing identifier field \"LocationID\"");
    }
}
