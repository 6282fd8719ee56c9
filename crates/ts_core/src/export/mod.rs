pub mod error;
pub mod exporters;

pub use error::ExportError;
pub use exporters::{export_to_csv, export_to_json, export_to_markdown};
