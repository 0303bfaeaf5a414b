//! CSV reading operations.

use std::{fs::File, path::Path, sync::Arc};

use polars::{io::SerReader, prelude::{CsvReadOptions, DataType, Field, PolarsError, Schema, SchemaRef}};

use crate::{crosswalk::CrosswalkRow, error::LoadError, layer::{TractId, ZoneId}};

use super::{TRACT_COLUMN, WEIGHT_COLUMN, ZONE_COLUMN};

/// Read a crosswalk table written by [`write_crosswalk`](super::write_crosswalk).
///
/// Tract ids are kept as text so leading zeros survive.
pub fn read_crosswalk(path: &Path) -> Result<Vec<CrosswalkRow>, LoadError> {
    if !path.is_file() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }
    let table_err = |source: PolarsError| LoadError::Table { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(|e| table_err(e.into()))?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(crosswalk_schema()))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(table_err)?;

    let zones = df.column(ZONE_COLUMN).and_then(|c| c.cast(&DataType::Int64)).map_err(table_err)?;
    let tracts = df.column(TRACT_COLUMN).and_then(|c| c.cast(&DataType::String)).map_err(table_err)?;
    let weights = df.column(WEIGHT_COLUMN).and_then(|c| c.cast(&DataType::Float64)).map_err(table_err)?;

    let zones = zones.i64().map_err(table_err)?;
    let tracts = tracts.str().map_err(table_err)?;
    let weights = weights.f64().map_err(table_err)?;

    let null_cell = |row: usize, column: &str| LoadError::NullCell {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
    };

    zones.into_iter()
        .zip(tracts.into_iter())
        .zip(weights.into_iter())
        .enumerate()
        .map(|(row, ((zone, tract), weight))| {
            Ok(CrosswalkRow {
                zone_id: ZoneId(zone.ok_or_else(|| null_cell(row, ZONE_COLUMN))?),
                tract_id: TractId::new(tract.ok_or_else(|| null_cell(row, TRACT_COLUMN))?),
                weight: weight.ok_or_else(|| null_cell(row, WEIGHT_COLUMN))?,
            })
        })
        .collect()
}

/// Schema overwrite for crosswalk CSV files.
fn crosswalk_schema() -> SchemaRef {
    Arc::new(Schema::from_iter([
        Field::new(ZONE_COLUMN.into(), DataType::Int64),
        Field::new(TRACT_COLUMN.into(), DataType::String),
        Field::new(WEIGHT_COLUMN.into(), DataType::Float64),
    ]))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn reads_rows_and_keeps_leading_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crosswalk.csv");
        fs::write(&path, "LocationID,census_tract_id,apportion_weight\n1,0100100,0.606061\n1,0100201,0.393939\n2,0100100,1.000000\n").unwrap();

        let rows = read_crosswalk(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].zone_id, ZoneId(1));
        assert_eq!(rows[0].tract_id.as_str(), "0100100");
        assert!((rows[1].weight - 0.393939).abs() < 1e-12);
        assert_eq!(rows[2].zone_id, ZoneId(2));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_crosswalk(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Missing(_)));
    }

    #[test]
    fn empty_cell_is_a_null_cell_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crosswalk.csv");
        fs::write(&path, "LocationID,census_tract_id,apportion_weight\n1,100,1.0\n2,200,\n").unwrap();

        match read_crosswalk(&path).unwrap_err() {
            LoadError::NullCell { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, WEIGHT_COLUMN);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_column_is_a_table_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crosswalk.csv");
        fs::write(&path, "LocationID,weight\n1,1.0\n").unwrap();
        assert!(matches!(read_crosswalk(&path).unwrap_err(), LoadError::Table { .. }));
    }
}
