//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Undo history capacity of a window when the config does not override it
pub const DEFAULT_UNDO_CAPACITY: usize = 15;

/// Console prompt when the config does not override it
pub const DEFAULT_PROMPT: &str = "vf> ";

/// Maximum number of entries printed by the `history` console command
pub const MAX_HISTORY_LISTING: usize = 10;
