//! Dessert Storefront Core - Shared types library.
//!
//! This crate provides the domain types used across the dessert storefront:
//! - `storefront` - Cart, favorites and filter engine
//! - `cli` - Terminal front-end driving the engine
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no clocks. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product names and prices, plus the
//!   catalog entry and cart line records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
