//! CLI command implementations.

pub mod check;
pub mod classify;
pub mod config;
pub mod prefetch;
pub mod render;
