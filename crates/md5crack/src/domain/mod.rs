//! Domain layer - Pure computational logic
//!
//! This module contains pure functions and algorithms without I/O dependencies.

pub mod alphabet;
pub mod chain;
pub mod md5;
pub mod reduce;
