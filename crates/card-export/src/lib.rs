//! The print pathway: data ingestion and batch PDF export.

mod pdf;
mod rows;
mod types;

pub use pdf::{EXPORT_PIXELS_PER_PT, ExportAssets, export_pdf, export_pdf_bytes};
pub use rows::{CsvOptions, rows_from_csv, rows_from_urls, valid_row_count};
pub use types::{ExportError, Result};
