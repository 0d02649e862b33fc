//! Configuration module for lodge-dues
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Organization settings persistence (monthly fee, receipt names)

pub mod paths;
pub mod settings;

pub use paths::LodgePaths;
pub use settings::Settings;
