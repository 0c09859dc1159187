pub mod common;
pub mod counts;
pub mod errors;
pub mod model;
pub mod repair;

pub use common::{normalize_field, parse_count};
pub use counts::{parse_count_table, read_count_file, read_count_table};
pub use errors::ParserError;
pub use model::{
    CountTable, ObservedRow, RepairDialect, RepairSummary, DEFAULT_YEAR_LABELS, MIN_ROW_WIDTH,
    OBSERVED_YEARS,
};
pub use repair::{repair, repair_file, repair_record, repair_str, RepairedRecord};
