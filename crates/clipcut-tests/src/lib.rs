//! Integration test crate for clipcut.
//!
//! Holds cross-crate tests that don't fit naturally inside a single
//! component crate: pipeline-wide scheduler behavior (reset cascades,
//! digest stability) and end-to-end runs through the step DAG.

#[cfg(test)]
mod scheduler;
