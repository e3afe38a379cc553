//! Subcommands: argument definitions in `mod.rs`, behavior in `handler.rs`

pub mod config;
pub mod import;
pub mod inspect;
pub mod sync;
