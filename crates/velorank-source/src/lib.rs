pub mod error;
pub mod fetch;
pub mod url;

pub use error::SourceError;
pub use fetch::{default_tabs, SheetSource, TabConfig, TabFetch, TabText};
pub use url::SheetRef;
