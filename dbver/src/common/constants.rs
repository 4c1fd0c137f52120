// schema constants
pub const MAIN_SCHEMA: &str = "main";

// pragma constants
pub const APPLICATION_ID_PRAGMA: &str = "application_id";
pub const USER_VERSION_PRAGMA: &str = "user_version";

// named format constants
pub const DEFAULT_FORMAT_TABLE: &str = "format";
pub const FORMAT_NAME_COLUMN: &str = "name";

// semver constants
pub const SEMVER_MAJOR_FACTOR: u32 = 1_000_000;
pub const SEMVER_MINOR_FACTOR: u32 = 1_000;
pub const UNPROVISIONED_VERSION: u32 = 0;
