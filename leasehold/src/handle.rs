//! Issued secrets and their lease metadata.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;

/// The payload of an issued secret.
///
/// The shape is fixed by the kind of request that produced it: key/value
/// secrets carry a single opaque string, dynamic credentials carry an ordered
/// pair (access-key-id and secret-access-key, or username and password).
/// Payloads are exposed only at the materialization boundary.
#[derive(Clone)]
pub enum SecretValue {
    /// A single opaque value.
    Single(SecretString),
    /// An ordered credential pair.
    Pair(SecretString, SecretString),
}

impl SecretValue {
    /// Wrap a single opaque value.
    #[must_use]
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(SecretString::from(value.into()))
    }

    /// Wrap an ordered credential pair.
    #[must_use]
    pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::Pair(
            SecretString::from(first.into()),
            SecretString::from(second.into()),
        )
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(_) => f.write_str("Single([REDACTED])"),
            Self::Pair(..) => f.write_str("Pair([REDACTED], [REDACTED])"),
        }
    }
}

/// The fields a successful renewal grants.
///
/// The store may grant less than the requested increment, and may flip
/// `renewable` off for a lease nearing its maximum TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LeaseRenewal {
    /// Granted lease duration in seconds, starting now.
    pub lease_duration: u64,
    /// Whether the lease can be renewed again.
    pub renewable: bool,
}

/// A secret issued by the store, together with its lease.
///
/// Handles are immutable: renewal produces a replacement handle via
/// [`SecretHandle::renewed`] rather than mutating in place. Only the lease
/// manager's cache owns handles; nothing else holds one across calls.
#[derive(Debug, Clone)]
pub struct SecretHandle {
    value: SecretValue,
    issued: DateTime<Utc>,
    lease_id: String,
    lease_duration: u64,
    renewable: bool,
}

impl SecretHandle {
    /// Create a handle from a store response.
    ///
    /// A `lease_duration` of zero means the store attached no explicit TTL;
    /// such a handle computes `expires() == issued` and is nominally expired
    /// on every check, so its refresh cadence is paced entirely by the
    /// requesting side's minimum-TTL floor.
    #[must_use]
    pub fn new(
        value: SecretValue,
        issued: DateTime<Utc>,
        lease_id: impl Into<String>,
        lease_duration: u64,
        renewable: bool,
    ) -> Self {
        Self {
            value,
            issued,
            lease_id: lease_id.into(),
            lease_duration,
            renewable,
        }
    }

    /// The secret payload.
    #[must_use]
    pub const fn value(&self) -> &SecretValue {
        &self.value
    }

    /// When the secret was issued (or last renewed).
    #[must_use]
    pub const fn issued(&self) -> DateTime<Utc> {
        self.issued
    }

    /// Opaque lease identifier assigned by the store.
    #[must_use]
    pub fn lease_id(&self) -> &str {
        &self.lease_id
    }

    /// Lease duration in seconds; zero means no explicit TTL.
    #[must_use]
    pub const fn lease_duration(&self) -> u64 {
        self.lease_duration
    }

    /// Whether the store will extend this lease on request.
    #[must_use]
    pub const fn renewable(&self) -> bool {
        self.renewable
    }

    /// Instant at which the lease lapses.
    ///
    /// Saturates to the far future when the duration does not fit the
    /// calendar.
    #[must_use]
    pub fn expires(&self) -> DateTime<Utc> {
        self.issued
            .checked_add_signed(delta_secs(self.lease_duration))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Time elapsed since issuance, as of `now`.
    ///
    /// Negative when `now` predates issuance (clock skew); callers treat that
    /// as a freshly issued handle.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.issued)
    }

    /// Check whether the lease has lapsed as of `as_of`.
    #[must_use]
    pub fn is_expired(&self, as_of: DateTime<Utc>) -> bool {
        as_of >= self.expires()
    }

    /// Check whether the lease will have lapsed within `margin` of `now`.
    #[must_use]
    pub fn is_about_to_expire(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        let probe = now
            .checked_add_signed(margin)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.is_expired(probe)
    }

    /// Build the replacement handle a successful renewal produces.
    ///
    /// The payload and lease id carry over unchanged; the issuance stamp is
    /// reset and duration/renewability are taken from the grant.
    #[must_use]
    pub fn renewed(&self, renewal: &LeaseRenewal, issued: DateTime<Utc>) -> Self {
        Self {
            value: self.value.clone(),
            issued,
            lease_id: self.lease_id.clone(),
            lease_duration: renewal.lease_duration,
            renewable: renewal.renewable,
        }
    }
}

/// Convert whole seconds to a `TimeDelta`, saturating on overflow.
pub(crate) fn delta_secs(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use secrecy::ExposeSecret;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn long_lived() -> SecretHandle {
        SecretHandle::new(
            SecretValue::single("foovalue"),
            issued_at(),
            "foo-lease-id-123",
            36000,
            false,
        )
    }

    #[test]
    fn test_expires_a_long_time_from_now() {
        let handle = long_lived();
        assert_eq!(handle.expires(), issued_at() + TimeDelta::seconds(36000));
    }

    #[test]
    fn test_age() {
        let handle = long_lived();
        let now = issued_at() + TimeDelta::seconds(600);
        assert_eq!(handle.age(now), TimeDelta::seconds(600));
    }

    #[test]
    fn test_is_expired() {
        let handle = long_lived();
        for offset in [30, 300, 3000, 30000] {
            assert!(!handle.is_expired(issued_at() + TimeDelta::seconds(offset)));
        }
        assert!(handle.is_expired(issued_at() + TimeDelta::seconds(36000)));
        assert!(handle.is_expired(issued_at() + TimeDelta::seconds(300_000)));
    }

    #[test]
    fn test_is_about_to_expire() {
        let handle = long_lived();
        let now = issued_at();
        for margin in [30, 300, 3000, 30000] {
            assert!(!handle.is_about_to_expire(now, TimeDelta::seconds(margin)));
        }
        assert!(handle.is_about_to_expire(now, TimeDelta::seconds(300_000)));
    }

    #[test]
    fn test_zero_duration_is_always_nominally_expired() {
        let handle = SecretHandle::new(
            SecretValue::single("foovalue"),
            issued_at(),
            "",
            0,
            false,
        );
        assert_eq!(handle.expires(), handle.issued());
        assert!(handle.is_expired(issued_at()));
    }

    #[test]
    fn test_renewed_resets_issuance_and_takes_the_grant() {
        let handle = long_lived();
        let grant = LeaseRenewal {
            lease_duration: 1800,
            renewable: true,
        };
        let later = issued_at() + TimeDelta::seconds(35000);
        let renewed = handle.renewed(&grant, later);

        assert_eq!(renewed.lease_id(), handle.lease_id());
        assert_eq!(renewed.issued(), later);
        assert_eq!(renewed.lease_duration(), 1800);
        assert!(renewed.renewable());
        assert_eq!(renewed.expires(), later + TimeDelta::seconds(1800));
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let single = format!("{:?}", SecretValue::single("hunter2"));
        assert!(!single.contains("hunter2"));
        assert!(single.contains("[REDACTED]"));

        let handle = SecretHandle::new(
            SecretValue::pair("AKIAFOO", "wJalrXUtnFEMI"),
            issued_at(),
            "aws/creds/writer/abc",
            900,
            true,
        );
        let debug = format!("{handle:?}");
        assert!(!debug.contains("AKIAFOO"));
        assert!(!debug.contains("wJalrXUtnFEMI"));
        assert!(debug.contains("aws/creds/writer/abc"));
    }

    #[test]
    fn test_pair_order_is_preserved() {
        let SecretValue::Pair(first, second) = SecretValue::pair("user", "pass") else {
            panic!("expected a pair");
        };
        assert_eq!(first.expose_secret(), "user");
        assert_eq!(second.expose_secret(), "pass");
    }
}
