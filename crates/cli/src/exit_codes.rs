//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: CI scripts branch on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                         |
//! |------|-----------|-----------------------------------------------------|
//! | 0    | Universal | Success; every compared cell matches               |
//! | 2    | Universal | CLI usage error (bad args, unsupported extension)   |
//! | 3    | recon     | Mismatches or missing rows/columns found            |
//! | 4    | recon     | Only review items found (no mismatch, no missing)   |
//! | 5    | recon     | Invalid config (parse, validation, key column)      |
//! | 6    | recon     | Runtime failure (unreadable input, write failure)   |
//! | 7    | recon     | The tables share no language column to compare      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed, nothing to report.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, unsupported output format.
/// clap exits with the same code for argument parse failures.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Recon (3-7)
// =============================================================================

/// At least one mismatch, missing row or missing column.
pub const EXIT_DIFFERENCES: u8 = 3;

/// No differences, but some cells need review.
pub const EXIT_REVIEW: u8 = 4;

/// Config failed to parse or validate, or names a column the table lacks.
pub const EXIT_INVALID_CONFIG: u8 = 5;

/// Input could not be read or output could not be written.
pub const EXIT_RUNTIME: u8 = 6;

/// No language column resolved in both tables, so nothing was compared.
pub const EXIT_NO_LANGUAGES: u8 = 7;

// =============================================================================
// Mapping
// =============================================================================

use lexigrid_recon::ReconError;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_)
        | ReconError::UnknownLanguage(_)
        | ReconError::MissingColumn { .. } => EXIT_INVALID_CONFIG,
        ReconError::NoLanguages { .. } => EXIT_NO_LANGUAGES,
    }
}

/// Exit code for a finished run: differences outrank review items.
pub fn outcome_exit_code(has_differences: bool, needs_review: bool) -> u8 {
    if has_differences {
        EXIT_DIFFERENCES
    } else if needs_review {
        EXIT_REVIEW
    } else {
        EXIT_SUCCESS
    }
}
