use std::sync::Arc;

use crate::config::TableSettings;
use crate::error::Result;
use crate::models::{HygrometricTable, StationPressureTable};
use crate::readers::{HygrometricReader, PressureReader};

/// Both reference tables, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub hygrometric: Arc<HygrometricTable>,
    pub station_pressure: Arc<StationPressureTable>,
}

impl ReferenceTables {
    pub fn new(hygrometric: HygrometricTable, station_pressure: StationPressureTable) -> Self {
        Self {
            hygrometric: Arc::new(hygrometric),
            station_pressure: Arc::new(station_pressure),
        }
    }

    pub fn embedded() -> Result<Self> {
        Self::load(&TableSettings::default())
    }

    /// Load each table from its override file when configured, otherwise
    /// from the copy compiled into the binary.
    pub fn load(settings: &TableSettings) -> Result<Self> {
        let hygrometric = match &settings.hygrometric {
            Some(path) => {
                tracing::info!(path = %path.display(), "Reading hygrometric table override");
                HygrometricReader::new().read_table(path)?
            }
            None => HygrometricReader::new().read_embedded()?,
        };

        let station_pressure = match &settings.station_pressure {
            Some(path) => {
                tracing::info!(path = %path.display(), "Reading station pressure table override");
                PressureReader::new().read_table(path)?
            }
            None => PressureReader::new().read_embedded()?,
        };

        Ok(Self::new(hygrometric, station_pressure))
    }

    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Hygrometric table:".to_string());
        match self.hygrometric.dry_bulb_range() {
            Some(range) => lines.push(format!(
                "  Dry-bulb rows: {}..={} °C ({} rows)",
                range.start(),
                range.end(),
                self.hygrometric.row_count()
            )),
            None => lines.push("  No rows".to_string()),
        }
        if let Some(max) = self.hygrometric.max_difference_degrees() {
            lines.push(format!(
                "  Differences: {} steps up to {:.1} °C",
                self.hygrometric.differences().len(),
                max
            ));
        }
        lines.push(format!(
            "  Filled cells: {}",
            self.hygrometric.filled_cell_count()
        ));

        lines.push("Station pressure table:".to_string());
        lines.push(format!(
            "  Dry-bulb rows: {}",
            self.station_pressure.row_count()
        ));
        if let Some((lo, hi)) = self.station_pressure.pressure_span() {
            lines.push(format!("  Pressure levels: {:.0}..={:.0} hPa", lo, hi));
        }

        lines.join("\n")
    }
}
