//! CLI commands implementation

pub mod add;
pub mod query;

pub use add::*;
pub use query::*;
