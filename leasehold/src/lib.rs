//! Declarative secret leasing over HashiCorp Vault.
//!
//! Callers declare the secrets a workload needs once; the lease manager
//! keeps them fresh for the life of the process, reusing, renewing, or
//! replacing each lease as it ages.

pub mod binder;
pub mod client;
pub mod config;
pub mod error;
pub mod handle;
pub mod manager;
pub mod request;
pub mod responses;
pub mod retry;
pub mod store;

pub use binder::{RequestBinder, TokenSource};
pub use client::VaultClient;
pub use config::VaultConfig;
pub use error::{Error, Result};
pub use handle::{LeaseRenewal, SecretHandle, SecretValue};
pub use manager::{Decision, LeaseManager, AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY};
pub use request::SecretRequest;
pub use retry::{RetryConfig, RetryPolicy};
pub use store::SecretStore;
