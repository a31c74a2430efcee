pub mod document;
pub mod report;

pub use document::{stored_ids, DocumentIndexer};
pub use report::{FileOutcome, IndexReport};
