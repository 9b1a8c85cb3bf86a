//! Shared proptest generators for the secret request and lease domain.

use chrono::{TimeDelta, Utc};
use leasehold::{SecretHandle, SecretRequest, SecretValue};
use proptest::prelude::*;

/// Generate publication names.
pub fn secret_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{2,20}"
}

/// Generate Vault role names.
pub fn role_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{2,20}"
}

/// Generate engine mount points, weighted toward the stock ones.
pub fn mount_point_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("aws/".to_string()),
        Just("database/".to_string()),
        Just("secret/".to_string()),
        "[a-z][a-z0-9-]{2,12}/",
    ]
}

/// Generate KV secret paths.
pub fn secret_path_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}(/[a-z][a-z0-9-]{0,20}){0,3}"
}

/// Generate lease ids shaped like the store's.
pub fn lease_id_strategy() -> impl Strategy<Value = String> {
    (mount_point_strategy(), role_strategy(), "[a-zA-Z0-9]{20,24}")
        .prop_map(|(mount, role, suffix)| format!("{mount}creds/{role}/{suffix}"))
}

/// Generate lease durations, zero included.
pub fn lease_duration_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), 1u64..86400]
}

/// Generate per-request refresh floors.
pub fn minimum_ttl_strategy() -> impl Strategy<Value = u64> {
    0u64..7200
}

/// Generate a request of any variant.
pub fn secret_request_strategy() -> impl Strategy<Value = SecretRequest> {
    prop_oneof![
        (secret_name_strategy(), role_strategy())
            .prop_map(|(name, role)| SecretRequest::aws(name, role)),
        (
            secret_name_strategy(),
            role_strategy(),
            "[a-z][a-z0-9-]{2,15}",
            1u16..,
            "[a-z][a-z0-9_]{2,15}",
        )
            .prop_map(|(name, role, host, port, database)| {
                SecretRequest::database(name, role, "postgresql", host, port, database, "")
            }),
        (
            secret_name_strategy(),
            secret_path_strategy(),
            "[a-z][a-z0-9_]{2,15}",
        )
            .prop_map(|(name, path, key)| SecretRequest::generic(name, path, key)),
    ]
}

/// Generate a single-value handle at an arbitrary point in its life.
pub fn secret_handle_strategy() -> impl Strategy<Value = SecretHandle> {
    (
        "[a-zA-Z0-9]{8,32}",
        lease_id_strategy(),
        0i64..7200,
        lease_duration_strategy(),
        any::<bool>(),
    )
        .prop_map(|(value, lease_id, age_secs, lease_duration, renewable)| {
            SecretHandle::new(
                SecretValue::single(value),
                Utc::now() - TimeDelta::seconds(age_secs),
                lease_id,
                lease_duration,
                renewable,
            )
        })
}
