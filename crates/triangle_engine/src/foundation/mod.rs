//! Foundation module - Core utilities and types
//!
//! - Math types and the fixed-function style matrix builders
//! - Frame timing

pub mod math;
pub mod time;
