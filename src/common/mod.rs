//! Shared plumbing used across the crate

pub mod fs;
