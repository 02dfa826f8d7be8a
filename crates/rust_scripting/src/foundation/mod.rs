//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math value types and free functions
//! - GUID identifiers
//! - Time management
//! - Logging utilities

pub mod guid;
pub mod logging;
pub mod math;
pub mod time;
