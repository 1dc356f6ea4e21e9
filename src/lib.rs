//! `roomledger` - dormitory and housing management
//!
//! This crate manages a building → floor → room hierarchy with resident
//! assignment and monthly water/electricity billing. Flat rows fetched from a
//! backing store are normalized into a nested in-memory tree which serves as
//! the source of truth for the current session; every mutation goes through a
//! defined command on [`state::DormState`] and issues a best-effort write back
//! to the store.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,       // Will add gradually
    clippy::missing_panics_doc,       // Will add gradually
)]

/// Application configuration (environment + optional config.toml)
pub mod config;
/// Core business logic - tree building, analytics, billing, seeding, auth
pub mod core;
/// SeaORM entity definitions for the backing store tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Strict domain model - the nested building/floor/room tree
pub mod model;
/// Command wiring between the in-memory state and the store
pub mod service;
/// Application state object with all mutation commands
pub mod state;
/// External store contract and its SQLite implementation
pub mod store;

#[cfg(test)]
pub mod test_utils;
