// FindingL - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, app, or open files directly.

pub mod discovery;
pub mod export;
pub mod model;
pub mod parser;
pub mod predicate;
pub mod scanner;
