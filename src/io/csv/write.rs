//! CSV writing operations.

use std::path::Path;

use polars::{frame::DataFrame, io::SerWriter, prelude::{Column, CsvWriter}};

use crate::{
    common::write_atomic,
    crosswalk::{Crosswalk, CrosswalkRow},
    error::WriteError,
};

use super::{TRACT_COLUMN, WEIGHT_COLUMN, ZONE_COLUMN};

/// Decimal places written for `apportion_weight`.
const WEIGHT_PRECISION: usize = 6;

/// Encode rows as CSV bytes with a header and six-decimal weights.
pub(crate) fn crosswalk_csv_bytes(rows: &[CrosswalkRow]) -> Result<Vec<u8>, WriteError> {
    let zone_ids = rows.iter().map(|row| row.zone_id.0).collect::<Vec<_>>();
    let tract_ids = rows.iter().map(|row| row.tract_id.as_str()).collect::<Vec<_>>();
    let weights = rows.iter().map(|row| row.weight).collect::<Vec<_>>();

    let mut df = DataFrame::new(vec![
        Column::new(ZONE_COLUMN.into(), zone_ids),
        Column::new(TRACT_COLUMN.into(), tract_ids),
        Column::new(WEIGHT_COLUMN.into(), weights),
    ])?;

    let mut out = Vec::new();
    CsvWriter::new(&mut out)
        .include_header(true)
        .with_float_precision(Some(WEIGHT_PRECISION))
        .finish(&mut df)?;
    Ok(out)
}

/// Write the crosswalk to `path`, replacing any previous file only once the new one is complete.
pub fn write_crosswalk(crosswalk: &Crosswalk, path: &Path) -> Result<(), WriteError> {
    let bytes = crosswalk_csv_bytes(&crosswalk.rows())?;
    write_atomic(path, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::ZoneId;

    fn row(zone: i64, tract: &str, weight: f64) -> CrosswalkRow {
        CrosswalkRow { zone_id: ZoneId(zone), tract_id: tract.into(), weight }
    }

    #[test]
    fn header_and_six_decimal_weights() {
        let bytes = crosswalk_csv_bytes(&[row(1, "1000100", 0.6 / 0.99), row(1, "1000201", 0.39 / 0.99)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "LocationID,census_tract_id,apportion_weight");
        assert_eq!(lines[1], "1,1000100,0.606061");
        assert_eq!(lines[2], "1,1000201,0.393939");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_table_still_has_a_header() {
        let text = String::from_utf8(crosswalk_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(text.trim_end(), "LocationID,census_tract_id,apportion_weight");
    }
}
