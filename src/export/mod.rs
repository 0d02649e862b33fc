//! Data export
//!
//! CSV of dues entries for spreadsheets and the lodge secretary.

pub mod csv;

pub use self::csv::export_dues_csv;
