//! Shared test utilities for the confvault workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`device`] — loopback fake of a firewall management API
//! - [`git`] — assertions over device repositories

pub mod device;
pub mod git;
