/// Embedded reference tables
pub const HYGROMETRIC_TABLE_CSV: &str = include_str!("../../data/hygrometric_table.csv");
pub const STATION_PRESSURE_CSV: &str = include_str!("../../data/station_pressure.csv");

/// Header of the key column in both reference tables
pub const DRY_BULB_COLUMN: &str = "dry_bulb";

/// Separator between dew point and relative humidity in a hygrometric cell
pub const HYGROMETRIC_CELL_SEPARATOR: char = '/';

/// Differences are keyed in tenths of a degree
pub const TENTHS_PER_DEGREE: f64 = 10.0;

/// Station pressure is rounded to this step before the sea-level lookup
pub const SEA_LEVEL_LOOKUP_STEP: f64 = 5.0;

/// Squall direction bounds (degrees)
pub const MIN_SQUALL_DIRECTION: u16 = 0;
pub const MAX_SQUALL_DIRECTION: u16 = 360;

/// Segmented header boxes
pub const DATA_TYPE_BOXES: usize = 2;
pub const STATION_NO_BOXES: usize = 5;
pub const YEAR_BOXES: usize = 2;

/// Daily summary slots
pub const DAILY_MEASUREMENT_SLOTS: usize = 16;
pub const DAILY_METEOR_CODE_SLOTS: usize = 8;

/// Submission endpoints, relative to the configured base URL
pub const FIRST_CARD_ENDPOINT: &str = "/api/first-card-data";
pub const DAILY_SUMMARY_ENDPOINT: &str = "/api/daily-summary";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fallback messages when the server gives no reason
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save data";
pub const DAILY_SAVE_FAILED_MESSAGE: &str = "Failed to save weather data";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";
pub const DAILY_NETWORK_ERROR_MESSAGE: &str =
    "An unexpected error occurred while submitting the form.";

/// Configuration
pub const DEFAULT_CONFIG_FILE: &str = "station-obs.toml";
pub const ENV_PREFIX: &str = "STATION_OBS";
