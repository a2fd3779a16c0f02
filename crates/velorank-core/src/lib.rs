pub mod entry;
pub mod extract;
pub mod grid;
pub mod rank;

pub use entry::{Category, Entry, ResultSet, ValidationLimits};
pub use extract::{
    extract_category, extract_rows, try_extract_category, ExtractError, Field, HeaderMap,
};
pub use grid::parse_rows;
pub use rank::{filter_valid, sort_entries, top_n};
