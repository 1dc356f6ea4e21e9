//! Core business logic - framework-agnostic and side-effect free.
//!
//! Everything in here is a pure function of its inputs: the tree builder and
//! fallback generator that produce the domain tree, the analytics aggregator
//! over it, the billing arithmetic, and the credential check.

/// Monthly usage analytics over one building
pub mod analytics;
/// Credential matching against the in-memory user list
pub mod auth;
/// Unit prices, month keys, and bill payload assembly
pub mod billing;
/// Deterministic fallback/seed tree generation
pub mod seed;
/// Flat rows to nested tree normalization
pub mod tree;
