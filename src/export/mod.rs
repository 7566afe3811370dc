pub mod csv_export;
pub mod xlsx_export;

pub use csv_export::{export_merged_csv, export_summary_csv};
pub use xlsx_export::export_merged_xlsx;
