//! Core library for the gradebook-tools command line application.
//!
//! The library merges inconsistently formatted gradebook exports into one
//! students × scores table. IO adapters live under [`gradebook::tools::io`],
//! data representations inside [`gradebook::tools::model`], the heuristic
//! roster reading in [`gradebook::tools::header`] and
//! [`gradebook::tools::roster`], score gathering in
//! [`gradebook::tools::scores`], the join in [`gradebook::tools::merge`] and
//! the per-directory orchestration under [`gradebook::tools::summarize`].

pub mod gradebook;

pub use gradebook::tools::{
    Result, ToolError, config, error, header, io, merge, model, report, roster, scores, summarize,
};
