//! `lexigrid-recon`: key reconciliation and similarity classification for
//! multilingual translation tables.
//!
//! Pure engine crate: receives pre-loaded tables, returns classified verdicts.
//! No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod index;
pub mod language;
pub mod matcher;
pub mod model;
pub mod similarity;
pub mod summary;

pub use config::{KeyColumn, ReconConfig, ReportMode, TableConfig};
pub use engine::{
    reconcile_tables, run, run_with_progress, NoProgress, ProgressObserver, VerdictSink,
};
pub use error::ReconError;
pub use language::Language;
pub use model::{Cell, CellVerdict, ReconInput, ReconResult, Table, Verdict};
