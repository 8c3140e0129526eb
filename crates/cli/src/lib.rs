//! Command-line front end for the store-hours engine.

pub mod cli;
