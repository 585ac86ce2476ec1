// FindingL - app/mod.rs
//
// Application layer: file-level scan orchestration.
// Dependencies: core layer.

pub mod scan;
