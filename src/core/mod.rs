//! Core business logic - framework-agnostic ledger, propagation and menu operations.
//!
//! Each submodule owns one part of the pricing graph. Functions take a database
//! connection and return [`crate::errors::Result`]; nothing here prints or parses
//! command-line input.

pub mod composition;
pub mod cost;
pub mod export;
pub mod import;
pub mod ingredient;
pub mod menu;
pub mod product;
pub mod propagation;
pub mod report;
pub mod unit;
