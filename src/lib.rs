//! Core library for the `crdp-stress` CLI.
//!
//! The binary drives a CRDP data-protection service through one protect
//! phase and one reveal phase and reports throughput for each. This crate
//! holds the pieces it is built from: CLI argument types, configuration
//! loading, workload construction, the REST client, and the timing harness.
//! The command-line application is the primary interface; library APIs may
//! change with it.
pub mod args;
pub mod client;
pub mod config;
pub mod error;
pub mod harness;
pub mod workload;
