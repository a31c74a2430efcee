pub mod index_store;
pub mod local;
pub mod r#trait;

pub use index_store::IndexStore;
pub use local::LocalVectorStore;
pub use r#trait::{VectorRecord, VectorStore};
