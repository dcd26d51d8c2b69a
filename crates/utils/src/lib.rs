pub mod database;
pub mod search;
pub mod sink;

// Re-export commonly used items
pub use crate::database::{collection_path, ensure_database_dir, read_collection};
pub use crate::search::{search_similar, DEFAULT_SEARCH_LIMIT};
pub use crate::sink::{fields_of, CollectionFileSink, MemorySink, RecordSink, SinkError};
