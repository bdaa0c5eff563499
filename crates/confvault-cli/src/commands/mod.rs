//! Command implementations for confvault-cli

pub mod capture;
pub mod history;
pub mod report;
pub mod run;

pub use capture::run_capture;
pub use history::run_history;
pub use run::run_inventory;
