//! Shared test utilities for the leasehold workspace.
//!
//! This crate provides:
//! - Proptest generators for the secret request and lease domain
//! - A scripted mock secret store with call recording
//! - Fixtures for pre-aged handles and canned Vault response bodies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
