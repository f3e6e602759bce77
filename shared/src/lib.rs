pub mod boolish;
pub mod error;

// Re-export commonly used items
pub use boolish::parse_bool_like;
pub use error::{DomainError, DomainResult};
