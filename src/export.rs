//! Writers for handing tables to a presentation layer.

use std::io::Write;

use serde::Serialize;

use crate::error::PipelineResult;
use crate::types::DataSet;

/// Write `dataset` as comma-separated text with a header row. Nulls are written as empty cells.
pub fn write_csv<W: Write>(dataset: &DataSet, writer: W) -> PipelineResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write any serializable artifact as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(value: &T, mut writer: W) -> PipelineResult<()> {
    serde_json::to_writer_pretty(&mut writer, value).map_err(std::io::Error::from)?;
    writeln!(writer)?;
    Ok(())
}
