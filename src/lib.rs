pub mod api;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod keywords;
pub mod lexer;
pub mod report;
pub mod river;
pub mod splitter;
pub mod token;

// Re-export the main public API
pub use api::{run, RunOptions};
pub use error::{Result, SqlRiverError};
pub use formatter::format_string;
