//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const DEFAULT_RESET_CODE_TTL_MINUTES: i64 = 10;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const LOW_STOCK_THRESHOLD: i32 = 5;
pub const REPORT_WINDOW_DAYS: i64 = 30;
pub const REPORT_TOP_LIMIT: i64 = 10;
pub const BACKUP_FILE_PREFIX: &str = "shoes_store_backup_";
pub const BACKUP_FILE_SUFFIX: &str = ".sql";
