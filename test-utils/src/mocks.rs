//! Mock implementations for testing.
//!
//! [`MockSecretStore`] is a scripted [`SecretStore`]: tests queue up the
//! handles and renewal grants it should return, run the code under test,
//! then inspect the recorded calls.

use async_trait::async_trait;
use leasehold::{Error, LeaseRenewal, Result, SecretHandle, SecretStore};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Every store call made, in order, with its arguments.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    /// `(token, role)` per authenticate call.
    pub authenticate: Vec<(String, String)>,
    /// `(role, mount_point)` per AWS fetch.
    pub fetch_aws: Vec<(String, String)>,
    /// `(role, mount_point)` per database fetch.
    pub fetch_database: Vec<(String, String)>,
    /// `(path, key, mount_point)` per generic fetch.
    pub fetch_generic: Vec<(String, String, String)>,
    /// `(lease_id, increment_secs)` per renew call.
    pub renew: Vec<(String, u64)>,
}

impl CallLog {
    /// Total fetches of any kind.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetch_aws.len() + self.fetch_database.len() + self.fetch_generic.len()
    }

    /// Total store round-trips of any kind.
    #[must_use]
    pub fn total(&self) -> usize {
        self.authenticate.len() + self.fetches() + self.renew.len()
    }
}

#[derive(Debug, Default)]
struct MockState {
    authenticated: bool,
    stay_unauthenticated: bool,
    reject_authentication: bool,
    aws: VecDeque<SecretHandle>,
    database: VecDeque<SecretHandle>,
    generic: VecDeque<SecretHandle>,
    renewals: VecDeque<LeaseRenewal>,
    calls: CallLog,
}

/// Scripted mock secret store.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and keep another for scripting and inspection. Fetch and renew calls
/// consume their queues front to back; an empty queue fails the call, which
/// doubles as an "unexpected extra call" assertion.
#[derive(Debug, Clone, Default)]
pub struct MockSecretStore {
    state: Arc<RwLock<MockState>>,
}

impl MockSecretStore {
    /// Create an unauthenticated store with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an established session without recording a call.
    pub async fn set_authenticated(&self, authenticated: bool) {
        self.state.write().await.authenticated = authenticated;
    }

    /// Keep reporting "not authenticated" even after successful logins, so
    /// tests observe per-cycle dedup rather than session reuse.
    pub async fn stay_unauthenticated(&self) {
        self.state.write().await.stay_unauthenticated = true;
    }

    /// Reject every subsequent authentication attempt.
    pub async fn reject_authentication(&self) {
        self.state.write().await.reject_authentication = true;
    }

    /// Queue a handle for the next AWS fetch.
    pub async fn push_aws(&self, handle: SecretHandle) {
        self.state.write().await.aws.push_back(handle);
    }

    /// Queue a handle for the next database fetch.
    pub async fn push_database(&self, handle: SecretHandle) {
        self.state.write().await.database.push_back(handle);
    }

    /// Queue a handle for the next generic fetch.
    pub async fn push_generic(&self, handle: SecretHandle) {
        self.state.write().await.generic.push_back(handle);
    }

    /// Queue a grant for the next renew call.
    pub async fn push_renewal(&self, renewal: LeaseRenewal) {
        self.state.write().await.renewals.push_back(renewal);
    }

    /// Snapshot of every call recorded so far.
    pub async fn calls(&self) -> CallLog {
        self.state.read().await.calls.clone()
    }
}

#[async_trait]
impl SecretStore for MockSecretStore {
    async fn is_authenticated(&self) -> bool {
        let state = self.state.read().await;
        state.authenticated && !state.stay_unauthenticated
    }

    async fn authenticate(&self, token: &str, role: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .calls
            .authenticate
            .push((token.to_string(), role.to_string()));
        if state.reject_authentication {
            return Err(Error::auth_failed("mock store rejected the login"));
        }
        state.authenticated = true;
        Ok(())
    }

    async fn fetch_aws(&self, role: &str, mount_point: &str) -> Result<SecretHandle> {
        let mut state = self.state.write().await;
        state
            .calls
            .fetch_aws
            .push((role.to_string(), mount_point.to_string()));
        state
            .aws
            .pop_front()
            .ok_or_else(|| Error::unavailable("no scripted AWS credentials left"))
    }

    async fn fetch_database(&self, role: &str, mount_point: &str) -> Result<SecretHandle> {
        let mut state = self.state.write().await;
        state
            .calls
            .fetch_database
            .push((role.to_string(), mount_point.to_string()));
        state
            .database
            .pop_front()
            .ok_or_else(|| Error::unavailable("no scripted database credentials left"))
    }

    async fn fetch_generic(
        &self,
        path: &str,
        key: &str,
        mount_point: &str,
    ) -> Result<SecretHandle> {
        let mut state = self.state.write().await;
        state.calls.fetch_generic.push((
            path.to_string(),
            key.to_string(),
            mount_point.to_string(),
        ));
        state
            .generic
            .pop_front()
            .ok_or_else(|| Error::unavailable("no scripted generic secrets left"))
    }

    async fn renew(&self, lease_id: &str, increment_secs: u64) -> Result<LeaseRenewal> {
        let mut state = self.state.write().await;
        state
            .calls
            .renew
            .push((lease_id.to_string(), increment_secs));
        state
            .renewals
            .pop_front()
            .ok_or_else(|| Error::unavailable("no scripted renewal left"))
    }
}
