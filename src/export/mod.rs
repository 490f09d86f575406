//! PDF export of a user's company records.

pub mod pdf;

pub use pdf::{ExportLine, export_lines, render_pdf};
