//! Core domain model for euphony.
//!
//! This crate defines the catalog track model, artist-credit parsing,
//! seed song references, and the CSV catalog loader that assigns every
//! track its stable ordinal.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod display;
pub mod error;
pub mod model;

pub use catalog::{Catalog, LoadReport};
pub use error::{Error, Result};
