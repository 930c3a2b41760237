use crate::api::cell::GridCell;
use crate::api::locator_arrow::GridCellsToArrow;
use crate::util::error::MaidenheadError;
use arrow_array::RecordBatch;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Writes a RecordBatch with a GeoArrow geometry column as GeoParquet (WKB encoded).
pub fn write_geoparquet(
    batch: &RecordBatch,
    path: impl AsRef<Path>,
) -> Result<(), MaidenheadError> {
    let path = path.as_ref();
    let schema = batch.schema();

    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();

    let mut encoder = GeoParquetRecordBatchEncoder::try_new(&schema, &options)
        .map_err(|e| MaidenheadError::IoError(e.to_string()))?;

    let file = File::create(path).map_err(|e| MaidenheadError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, encoder.target_schema(), None)
        .map_err(|e| MaidenheadError::IoError(e.to_string()))?;

    let encoded_batch = encoder
        .encode_record_batch(batch)
        .map_err(|e| MaidenheadError::IoError(e.to_string()))?;

    writer
        .write(&encoded_batch)
        .map_err(|e| MaidenheadError::IoError(e.to_string()))?;

    let kv_metadata = encoder
        .into_keyvalue()
        .map_err(|e| MaidenheadError::IoError(e.to_string()))?;

    writer.append_key_value_metadata(kv_metadata);
    writer
        .finish()
        .map_err(|e| MaidenheadError::IoError(e.to_string()))?;

    debug!(rows = batch.num_rows(), path = %path.display(), "wrote geoparquet");
    Ok(())
}

pub trait GridCellsToGeoParquet: GridCellsToArrow {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MaidenheadError>;
}

impl GridCellsToGeoParquet for [GridCell] {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MaidenheadError> {
        let batch = self.to_record_batch()?;
        write_geoparquet(&batch, path)
    }
}

impl GridCellsToGeoParquet for Vec<GridCell> {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MaidenheadError> {
        self.as_slice().to_geoparquet(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::grid::LocatorGrid;
    use crate::core::precision::Precision;
    use tempfile::tempdir;

    #[test]
    fn test_grid_to_geoparquet() -> Result<(), MaidenheadError> {
        let grid = LocatorGrid::from_extent(-1.5, 51.2, 1.5, 51.8, Precision::Square);
        let cells = grid.cells().to_vec();

        let dir = tempdir().map_err(|e| MaidenheadError::IoError(e.to_string()))?;
        let path = dir.path().join("squares.parquet");

        cells.to_geoparquet(&path)?;

        assert!(path.exists());
        let metadata =
            std::fs::metadata(&path).map_err(|e| MaidenheadError::IoError(e.to_string()))?;
        assert!(metadata.len() > 0);
        Ok(())
    }

    #[test]
    fn test_single_cell_to_geoparquet() -> Result<(), MaidenheadError> {
        let dir = tempdir().map_err(|e| MaidenheadError::IoError(e.to_string()))?;
        let path = dir.path().join("cell.parquet");

        GridCell::from_locator("IO91xl")?.to_geoparquet(&path)?;
        assert!(path.exists());
        Ok(())
    }
}
