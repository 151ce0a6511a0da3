//! Application constants for the ETL pipeline
//!
//! Default locations, object storage prefixes, table names and
//! unit conversion factors used throughout the pipeline.

// =============================================================================
// Local Paths
// =============================================================================

/// Directory the raw files are staged from
pub const DEFAULT_SOURCE_DIR: &str = "source";

/// Directory raw objects are downloaded into before transformation
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloaded_raw";

/// Transformed output written by the merger
pub const DEFAULT_OUTPUT_PATH: &str = "transformed_output.csv";

/// Run log, appended for the duration of one run and archived at the end
pub const DEFAULT_LOG_PATH: &str = "etl_pipeline.log";

// =============================================================================
// Object Storage
// =============================================================================

/// Key prefixes inside the bucket
pub mod prefixes {
    pub const RAW: &str = "raw/";
    pub const TRANSFORMED: &str = "transformed/";
    pub const LOGS: &str = "logs/";
}

pub const DEFAULT_BUCKET: &str = "etl-pipeline";

/// Directory backing the local object store
pub const DEFAULT_STORAGE_ROOT: &str = "object_store";

pub const DEFAULT_REGION: &str = "us-east-1";

// =============================================================================
// Relational Sink
// =============================================================================

pub const DEFAULT_TABLE_NAME: &str = "etl_transformed_data";

pub const DEFAULT_DATABASE_PATH: &str = "etl_pipeline.sqlite3";

pub const DEFAULT_DATABASE_NAME: &str = "etl";

pub const DEFAULT_DATABASE_HOST: &str = "localhost";

pub const DEFAULT_DATABASE_PORT: u16 = 3306;

// =============================================================================
// Record Formats
// =============================================================================

/// Element name of one record inside an XML document
pub const XML_RECORD_ELEMENT: &str = "person";

// =============================================================================
// Unit Conversion
// =============================================================================

pub mod units {
    /// Column holding a height in inches
    pub const HEIGHT_COLUMN: &str = "height";

    /// Column holding a weight in pounds
    pub const WEIGHT_COLUMN: &str = "weight";

    /// Inches to metres
    pub const INCHES_TO_METRES: f64 = 0.0254;

    /// Pounds to kilograms
    pub const POUNDS_TO_KILOGRAMS: f64 = 0.453592;

    /// Decimal places kept after conversion
    pub const DECIMAL_PLACES: i32 = 2;
}

// =============================================================================
// Log Banners
// =============================================================================

pub const BANNER_STARTED: &str = "=== ETL Pipeline Started ===";
pub const BANNER_COMPLETED: &str = "=== ETL Pipeline Completed ===";
