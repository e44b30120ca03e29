// analysis/export.rs

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

use crate::analysis::aggregation::BerTable;
use crate::error::{Error, Result};

/// One row of the exported BER table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BerRecord {
    pub series: String,
    pub x: u32,
    pub erroneous_bits: u64,
    pub received_bits: u64,
    pub ber: f64,
    pub runs: usize,
}

pub fn records(table: &BerTable) -> Vec<BerRecord> {
    table
        .labels()
        .into_iter()
        .flat_map(|label| {
            table.points(label).into_iter().map(move |p| BerRecord {
                series: label.to_string(),
                x: p.x,
                erroneous_bits: p.counts.erroneous,
                received_bits: p.counts.received,
                ber: p.ber,
                runs: p.runs,
            })
        })
        .collect()
}

/// Write the table next to the figures so it can be re-plotted elsewhere.
pub fn write_csv(table: &BerTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(file);
    for record in records(table) {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| Error::io(path, e))?;
    log::info!("Saved table {}", path.display());
    Ok(())
}

pub fn read_csv(path: &Path) -> Result<Vec<BerRecord>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}
