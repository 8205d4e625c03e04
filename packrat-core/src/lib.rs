//! Packrat core library — domain types, validated configuration, errors.

pub mod config;
pub mod error;
pub mod types;
