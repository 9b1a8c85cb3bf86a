//! Test fixtures with sample data.
//!
//! Handles "issued in the past" let tests drive the lease lifecycle against
//! real wall-clock time: the store hands back a pre-aged handle, and the
//! next refresh cycle sees it at whatever point of its life the test needs.

use chrono::{TimeDelta, Utc};
use leasehold::{SecretHandle, SecretValue};
use serde_json::json;

/// A single-value handle issued `age_secs` ago.
#[must_use]
pub fn aged_single(
    value: &str,
    lease_id: &str,
    age_secs: i64,
    lease_duration: u64,
    renewable: bool,
) -> SecretHandle {
    SecretHandle::new(
        SecretValue::single(value),
        Utc::now() - TimeDelta::seconds(age_secs),
        lease_id,
        lease_duration,
        renewable,
    )
}

/// A two-part credential handle issued `age_secs` ago.
#[must_use]
pub fn aged_pair(
    first: &str,
    second: &str,
    lease_id: &str,
    age_secs: i64,
    lease_duration: u64,
    renewable: bool,
) -> SecretHandle {
    SecretHandle::new(
        SecretValue::pair(first, second),
        Utc::now() - TimeDelta::seconds(age_secs),
        lease_id,
        lease_duration,
        renewable,
    )
}

/// A Kubernetes auth login response body.
#[must_use]
pub fn login_response(client_token: &str, lease_duration: u64) -> serde_json::Value {
    json!({
        "request_id": "7f8a41f9-0000-4e5f-9d1c-000000000001",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "auth": {
            "client_token": client_token,
            "accessor": "8609694a-cdbc-db9b-d345-e782dbb562ed",
            "policies": ["default", "app"],
            "lease_duration": lease_duration,
            "renewable": true
        }
    })
}

/// An AWS engine credential response body.
#[must_use]
pub fn aws_response(
    access_key: &str,
    secret_key: &str,
    lease_id: &str,
    lease_duration: u64,
    renewable: bool,
) -> serde_json::Value {
    json!({
        "request_id": "7f8a41f9-0000-4e5f-9d1c-000000000002",
        "lease_id": lease_id,
        "renewable": renewable,
        "lease_duration": lease_duration,
        "data": {
            "access_key": access_key,
            "secret_key": secret_key,
            "security_token": null
        }
    })
}

/// A database engine credential response body.
#[must_use]
pub fn database_response(
    username: &str,
    password: &str,
    lease_id: &str,
    lease_duration: u64,
    renewable: bool,
) -> serde_json::Value {
    json!({
        "request_id": "7f8a41f9-0000-4e5f-9d1c-000000000003",
        "lease_id": lease_id,
        "renewable": renewable,
        "lease_duration": lease_duration,
        "data": {
            "username": username,
            "password": password
        }
    })
}

/// A KV v2 read response body wrapping the given fields.
#[must_use]
pub fn kv_response(fields: serde_json::Value) -> serde_json::Value {
    json!({
        "request_id": "7f8a41f9-0000-4e5f-9d1c-000000000004",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": {
            "data": fields,
            "metadata": {
                "created_time": "2025-01-15T12:00:00.000000Z",
                "deletion_time": "",
                "destroyed": false,
                "version": 3
            }
        }
    })
}

/// A lease renewal response body.
#[must_use]
pub fn renew_response(lease_id: &str, lease_duration: u64, renewable: bool) -> serde_json::Value {
    json!({
        "request_id": "7f8a41f9-0000-4e5f-9d1c-000000000005",
        "lease_id": lease_id,
        "renewable": renewable,
        "lease_duration": lease_duration,
        "warnings": null
    })
}
