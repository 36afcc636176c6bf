/// Column names expected in the pantry export header line.
pub const NAME_COLUMN: &str = "name";
pub const EXPIRATION_DATE_COLUMN: &str = "expirationDate";
pub const QUANTITY_COLUMN: &str = "quantity";
pub const KEYWORDS_COLUMN: &str = "keywords";
pub const PLACEMENT_COLUMN: &str = "placement";
pub const HIDDEN_COLUMN: &str = "hidden";

/// Quantity used when the column is blank or not a usable number
pub const DEFAULT_QUANTITY: u32 = 1;

/// Placement used when the column is blank
pub const UNKNOWN_PLACEMENT: &str = "Unknown";

/// Two-digit years below this value land in the 2000s, the rest in the 1900s
pub const DEFAULT_TWO_DIGIT_YEAR_PIVOT: u32 = 50;

/// Reason attached to rows skipped for a missing name
pub const EMPTY_NAME_REASON: &str = "empty name";

pub const DEFAULT_SOURCE_PATH: &str = "food.csv";
pub const DEFAULT_CONFIG_PATH: &str = "pantry.toml";
pub const DEFAULT_DATABASE_PATH: &str = "pantry.db";

// Store backend names accepted on the CLI and in config
pub const MEMORY_STORE: &str = "memory";
pub const LIBSQL_STORE: &str = "libsql";

/// Get all supported store backend names
pub fn get_supported_stores() -> Vec<&'static str> {
    vec![MEMORY_STORE, LIBSQL_STORE]
}
