//! Extraction of templated PDF tables into a single spreadsheet report.

pub mod batch;
pub mod clean;
pub mod extract;
pub mod report;
pub mod table;
pub mod tabula_wrapper;
pub mod template;
#[cfg(test)]
mod testutil;
