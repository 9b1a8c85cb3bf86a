//! Abstraction over the backing secret store.

use crate::error::Result;
use crate::handle::{LeaseRenewal, SecretHandle};
use async_trait::async_trait;

/// The operations the lease manager needs from a secret store.
///
/// [`VaultClient`](crate::client::VaultClient) is the production
/// implementation; tests substitute a scripted mock.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Whether the store currently holds a usable session.
    async fn is_authenticated(&self) -> bool;

    /// Establish a session from a platform identity token and role.
    async fn authenticate(&self, token: &str, role: &str) -> Result<()>;

    /// Issue dynamic AWS credentials for `role`.
    async fn fetch_aws(&self, role: &str, mount_point: &str) -> Result<SecretHandle>;

    /// Issue dynamic database credentials for `role`.
    async fn fetch_database(&self, role: &str, mount_point: &str) -> Result<SecretHandle>;

    /// Read one field of a static key/value secret.
    async fn fetch_generic(&self, path: &str, key: &str, mount_point: &str)
        -> Result<SecretHandle>;

    /// Ask the store to extend a lease by `increment_secs` seconds.
    async fn renew(&self, lease_id: &str, increment_secs: u64) -> Result<LeaseRenewal>;
}
