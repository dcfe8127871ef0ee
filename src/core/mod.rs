// Public modules
pub mod case;
pub mod error;
pub mod exclude;
pub mod project;
pub mod refactor;
pub mod scan;

// Re-export common types for convenience
pub use case::{AcronymSet, Convention, Direction};
pub use error::{Error, ErrorCode, Result};
pub use exclude::ExcludeConfig;
pub use refactor::{CancelToken, ConversionOutcome, ConversionRequest};
