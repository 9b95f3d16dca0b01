use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::models::ObservationRow;

pub struct ObservationReader;

impl ObservationReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_observations(&self, path: &Path) -> Result<Vec<ObservationRow>> {
        let file = File::open(path)?;
        self.read_from(file)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<Vec<ObservationRow>> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in csv_reader.deserialize() {
            let row: ObservationRow = result?;
            rows.push(row);
        }

        Ok(rows)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}
