use std::fs;
use std::path::Path;
use std::path::PathBuf;

use bytesize::ByteSize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::dataset::Dataset;
use crate::dataset::Table;
use crate::error::GymGenError;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub table: Table,
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: u64,
}

/// Writes one CSV with a header row per table into `dir`, replacing existing files.
pub fn write_dataset(dir: &Path, dataset: &Dataset) -> Result<Vec<WrittenTable>> {
    if !dir.try_exists()? {
        return Err(GymGenError::InvalidConfig(format!(
            "out path {dir:?} doesn't exist"
        )));
    }

    let written = vec![
        write_table(dir, Table::Customers, &dataset.customers)?,
        write_table(dir, Table::Members, &dataset.members)?,
        write_table(dir, Table::Visits, &dataset.visits)?,
        write_table(dir, Table::DayPasses, &dataset.day_passes)?,
        write_table(dir, Table::Sales, &dataset.sales)?,
    ];

    let total: u64 = written.iter().map(|w| w.bytes).sum();
    info!("dataset written to {dir:?}, {}", ByteSize::b(total));

    Ok(written)
}

fn write_table<T: Serialize>(dir: &Path, table: Table, rows: &[T]) -> Result<WrittenTable> {
    let path = dir.join(table.file_name());
    // header is written up front so that empty tables still carry one
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)?;
    wtr.write_record(table.columns())?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    let bytes = fs::metadata(&path)?.len();
    debug!("{table}: {} row(s), {} -> {path:?}", rows.len(), ByteSize::b(bytes));

    Ok(WrittenTable {
        table,
        path,
        rows: rows.len(),
        bytes,
    })
}
