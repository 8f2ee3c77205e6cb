//! Application layer - Use case implementations
//!
//! This module coordinates domain and infrastructure layers to implement use cases.

pub mod brute_force;
pub mod dictionary;
pub mod generator;
pub mod searcher;
