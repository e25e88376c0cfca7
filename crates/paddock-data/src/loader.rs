//! CSV ingestion seam.
//!
//! Loading is deliberately permissive: identifier and position columns are
//! normalized to strings after the read so that value-level malformation
//! ("\\N" grids, "DNF" finish cells) survives into the coercion step of the
//! feature engine instead of failing the read. Provider acquisition and
//! caching live outside this workspace.

use crate::error::Result;
use crate::schema;
use polars::prelude::*;
use std::path::Path;

/// Columns normalized to `String` after the read, when present.
const TEXT_COLUMNS: [&str; 7] = [
    schema::DRIVER_ID,
    schema::CONSTRUCTOR_ID,
    schema::EVENT_DATE,
    schema::EVENT_NAME,
    schema::STATUS,
    schema::GRID_POSITION,
    schema::FINISH_POSITION,
];

/// Read a raw event-history CSV into a DataFrame.
///
/// Validates the structural schema before returning, so callers never see a
/// frame that is missing required columns.
pub fn read_events_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let present = df.get_column_names_str();
    let casts: Vec<Expr> = TEXT_COLUMNS
        .iter()
        .filter(|name| present.contains(*name))
        .map(|name| col(*name).cast(DataType::String))
        .collect();

    let df = df.lazy().with_columns(casts).collect()?;
    schema::validate_schema(&df)?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use std::io::Write;

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_events_csv_normalizes_mixed_positions() {
        let path = write_temp_csv(
            "paddock_loader_mixed.csv",
            "driver_id,constructor_id,event_date,event_name,grid_position,finish_position,status,is_winner\n\
             ham,mercedes,2024-03-01,bahrain,1,1,Finished,1\n\
             alo,aston,2024-03-01,bahrain,\\N,DNF,Engine,0\n",
        );

        let df = read_events_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.column(schema::FINISH_POSITION).unwrap().dtype(),
            &DataType::String
        );
        assert_eq!(
            df.column(schema::DRIVER_ID).unwrap().dtype(),
            &DataType::String
        );

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_read_events_csv_rejects_missing_structural_columns() {
        let path = write_temp_csv(
            "paddock_loader_missing.csv",
            "driver_id,event_date,event_name\nham,2024-03-01,bahrain\n",
        );

        let err = read_events_csv(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingColumns { .. }));

        std::fs::remove_file(path).ok();
    }
}
