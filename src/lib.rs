//! Core library for the `loadctl` CLI.
//!
//! This crate provides the internal building blocks used by the binary: CLI
//! argument types, configuration parsing, user archetypes, the health-check
//! gate, and the external-tool scenario runner. The primary user-facing
//! interface is the `loadctl` command-line application; library APIs may
//! evolve as the CLI grows.
pub mod archetypes;
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod health;
pub mod logger;
pub mod runner;
pub mod summary;
