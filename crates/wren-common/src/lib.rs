//! Common utilities for the wren lexers and selector compiler.
//!
//! This crate provides shared infrastructure used by all components:
//! - **Warning System** - colored terminal output for non-fatal oddities

pub mod warning;
