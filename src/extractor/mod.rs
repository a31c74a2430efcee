pub mod markup;
pub mod registry;
pub mod tabular;
pub mod r#trait;

pub use markup::MarkupExtractor;
pub use registry::ExtractorRegistry;
pub use r#trait::TextExtractor;
pub use tabular::TabularExtractor;
