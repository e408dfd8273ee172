//! `menu-ledger` - A pricing ledger for a restaurant back office
//!
//! This crate tracks raw ingredient prices, propagates every price change through a
//! two-level bill of materials (primary ingredients, recipe lines, final products) and
//! exports the priced menu as a spreadsheet. Price histories are append-only at
//! every level.

#![deny(
    unsafe_code,
    unsafe_op_in_unsafe_fn,
    unreachable_code,
    unreachable_patterns,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::match_same_arms,
    clippy::too_many_lines,
    clippy::enum_glob_use,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
)]

/// Command-line interface - argument parsing, shared context and command handlers
pub mod cli;
/// Configuration management for database and application settings
pub mod config;
/// Core business logic - ledger, propagation, import/export and reporting operations
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
