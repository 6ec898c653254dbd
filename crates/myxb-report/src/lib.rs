//! myxb-report: presentation of GPA results.
//!
//! Renders per-subject tables, the semester summary, and markdown exports.

pub mod markdown;
pub mod style;
pub mod summary;
pub mod table;

pub use markdown::{generate_markdown, write_markdown_report};
pub use summary::render_summary;
pub use table::render_subject_table;
