// File I/O: translation tables in, reconciliation reports out

pub mod csource;
pub mod csv;
pub mod json;
pub mod report;
pub mod table;
pub mod xlsx;

pub use report::write_report;
pub use table::load_table;
