//! Wire shapes of the Vault API responses the client consumes.
//!
//! Every field the client relies on is required here, with no serde defaults:
//! a response missing one decodes to an error instead of a zeroed value, so a
//! half-formed lease never enters the cache.

use serde::Deserialize;
use std::collections::HashMap;

/// Response to a Kubernetes auth login.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    /// The issued session.
    pub auth: AuthData,
}

/// The `auth` block of a login response.
#[derive(Debug, Deserialize)]
pub struct AuthData {
    /// Session token for subsequent requests.
    pub client_token: String,
    /// Token TTL in seconds; zero means no explicit expiry.
    pub lease_duration: u64,
    /// Whether the token can be renewed.
    pub renewable: bool,
}

/// Response to an AWS credential issuance.
#[derive(Debug, Deserialize)]
pub struct AwsCredsResponse {
    /// The issued key pair.
    pub data: AwsCredsData,
    /// Lease identifier for renewal.
    pub lease_id: String,
    /// Lease duration in seconds.
    pub lease_duration: u64,
    /// Whether the lease can be renewed.
    pub renewable: bool,
}

/// The `data` block of an AWS credential response.
#[derive(Debug, Deserialize)]
pub struct AwsCredsData {
    /// `AWS_ACCESS_KEY_ID` value.
    pub access_key: String,
    /// `AWS_SECRET_ACCESS_KEY` value.
    pub secret_key: String,
}

/// Response to a database credential issuance.
#[derive(Debug, Deserialize)]
pub struct DatabaseCredsResponse {
    /// The issued account.
    pub data: DatabaseCredsData,
    /// Lease identifier for renewal.
    pub lease_id: String,
    /// Lease duration in seconds.
    pub lease_duration: u64,
    /// Whether the lease can be renewed.
    pub renewable: bool,
}

/// The `data` block of a database credential response.
#[derive(Debug, Deserialize)]
pub struct DatabaseCredsData {
    /// Generated account name.
    pub username: String,
    /// Generated password.
    pub password: String,
}

/// Response to a KV v2 read.
#[derive(Debug, Deserialize)]
pub struct KvResponse {
    /// Envelope around the stored fields.
    pub data: KvData,
    /// Lease identifier; empty for KV reads.
    pub lease_id: String,
    /// Lease duration in seconds; zero for KV reads.
    pub lease_duration: u64,
    /// Whether the lease can be renewed; false for KV reads.
    pub renewable: bool,
}

/// The `data` envelope of a KV v2 read.
#[derive(Debug, Deserialize)]
pub struct KvData {
    /// The stored fields themselves.
    pub data: HashMap<String, serde_json::Value>,
}
