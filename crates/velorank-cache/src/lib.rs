pub mod cache;
pub mod store;

pub use cache::{ResultCache, RESULT_KEY};
pub use store::{KeyValueStore, MemoryStore, StoreError};
