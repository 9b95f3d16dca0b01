use crate::error::Result;
use crate::models::DerivedRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub struct DerivedWriter {
    delimiter: u8,
}

impl DerivedWriter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Write derived records to a CSV file, header included
    pub fn write_records(&self, records: &[DerivedRecord], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        self.write_to(records, file)
    }

    pub fn write_to<W: Write>(&self, records: &[DerivedRecord], writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        for record in records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn get_file_info(&self, records: &[DerivedRecord], path: &Path) -> Result<DerivedFileInfo> {
        Ok(DerivedFileInfo {
            total_rows: records.len(),
            ok_rows: records.iter().filter(|r| r.is_ok()).count(),
            file_size: std::fs::metadata(path)?.len(),
        })
    }
}

impl Default for DerivedWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct DerivedFileInfo {
    pub total_rows: usize,
    pub ok_rows: usize,
    pub file_size: u64,
}

impl DerivedFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Derived File Summary:\n\
            - Total rows: {}\n\
            - Fully derived: {}\n\
            - File size: {:.1} KB",
            self.total_rows,
            self.ok_rows,
            self.file_size as f64 / 1024.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ObservationRow;
    use tempfile::TempDir;

    fn record() -> DerivedRecord {
        let row = ObservationRow {
            station_no: "41923".to_string(),
            observed_at: "2024-06-01T06:00".to_string(),
            dry_bulb: "25".to_string(),
            wet_bulb: "22".to_string(),
            bar_as_read: String::new(),
        };
        let mut record = DerivedRecord::from_row(&row);
        record.dew_point = Some(20.7);
        record.relative_humidity = Some(77.0);
        record.status = "missing_input".to_string();
        record.message = "Bar as read reading is missing".to_string();
        record
    }

    #[test]
    fn test_header_and_blank_cells() -> Result<()> {
        let mut buffer = Vec::new();
        DerivedWriter::new().write_to(&[record()], &mut buffer)?;
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some(
                "station_no,observed_at,dry_bulb,wet_bulb,bar_as_read,difference,dew_point,\
                 relative_humidity,height_difference_correction,station_level_pressure,\
                 sea_level_reduction_constant,sea_level_pressure,status,message"
            )
        );
        assert_eq!(
            lines.next(),
            Some("41923,2024-06-01T06:00,25,22,,,20.7,77.0,,,,,missing_input,Bar as read reading is missing")
        );
        Ok(())
    }

    #[test]
    fn test_write_creates_parent_dir() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output").join("derived.csv");

        let writer = DerivedWriter::new();
        writer.write_records(&[record()], &path)?;

        let info = writer.get_file_info(&[record()], &path)?;
        assert_eq!(info.total_rows, 1);
        assert_eq!(info.ok_rows, 0);
        assert!(info.file_size > 0);
        Ok(())
    }
}
