/// Column names of the station observation layout
pub const STATION_COLUMN: &str = "station";
pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";
pub const DAY_COLUMN: &str = "day";
pub const HOUR_COLUMN: &str = "hour";
pub const WIND_DIRECTION_COLUMN: &str = "wd";
pub const RAIN_COLUMN: &str = "RAIN";
pub const NO2_COLUMN: &str = "NO2";
pub const SO2_COLUMN: &str = "SO2";
pub const PM10_COLUMN: &str = "PM10";

/// Derived columns, recomputed on every run
pub const DATE_COLUMN: &str = "date";
pub const RAIN_CATEGORY_COLUMN: &str = "rain_cat";

/// Floating-point columns interpolated per station
pub const DEFAULT_NUMERIC_COLUMNS: &[&str] = &[
    "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP", "PRES", "DEWP", "RAIN", "WSPM",
];

/// Pollutants correlated against rainfall
pub const DEFAULT_CORRELATION_TARGETS: &[&str] = &[NO2_COLUMN, SO2_COLUMN, PM10_COLUMN];

/// Columns every input file must carry
pub const REQUIRED_COLUMNS: &[&str] = &[
    STATION_COLUMN,
    YEAR_COLUMN,
    MONTH_COLUMN,
    DAY_COLUMN,
    HOUR_COLUMN,
    RAIN_COLUMN,
    NO2_COLUMN,
    SO2_COLUMN,
    PM10_COLUMN,
    WIND_DIRECTION_COLUMN,
];

/// Rain category edges (mm), right-closed
pub const RAIN_LOWER_EDGE: f64 = -0.1;
pub const RAIN_NONE_MAX: f64 = 0.0;
pub const RAIN_LIGHT_MAX: f64 = 2.5;
pub const RAIN_MODERATE_MAX: f64 = 7.6;
pub const RAIN_HEAVY_MAX: f64 = 50.0;

/// Dashboard defaults
pub const DEFAULT_POLLUTANT: &str = NO2_COLUMN;
pub const DEFAULT_YEAR: i32 = 2017;
pub const DEFAULT_MAP_CACHE: &str = "no2_pollution_map.html";
pub const DEFAULT_CONFIG_FILE: &str = "airquality.toml";
pub const ENV_PREFIX: &str = "AIRQ";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_MMAP_THRESHOLD: u64 = 64 * 1024 * 1024;

/// Output timestamp layout for the derived `date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Map rendering
pub const MAP_ZOOM_START: u8 = 6;
pub const MAP_MIN_ZOOM: u8 = 5;
pub const MAP_MAX_ZOOM: u8 = 10;
pub const MAP_MARKER_RADIUS: u8 = 8;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
