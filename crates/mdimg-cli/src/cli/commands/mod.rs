//! CLI command handlers. Each command is in its own file.

pub(crate) mod run;
pub(crate) mod scan;

pub use run::run_localize;
pub use scan::run_scan;
