pub mod config;
pub mod error;
pub mod header;
pub mod io;
pub mod merge;
pub mod model;
pub mod report;
pub mod roster;
pub mod scores;
pub mod summarize;

pub use error::{Result, ToolError};
