//! Vault HTTP client implementing [`SecretStore`].

use crate::{
    config::VaultConfig,
    error::{Error, Result},
    handle::{LeaseRenewal, SecretHandle, SecretValue},
    responses::{AuthResponse, AwsCredsResponse, DatabaseCredsResponse, KvResponse},
    retry::{RetryConfig, RetryPolicy},
    store::SecretStore,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// An authenticated Vault session.
struct AuthToken {
    client_token: String,
    expires_at: Option<Instant>,
}

impl AuthToken {
    /// A session is fresh while at least the grace period remains, so a
    /// token never lapses in the middle of a refresh cycle.
    fn fresh(&self, grace: Duration) -> bool {
        self.expires_at
            .is_none_or(|at| at.saturating_duration_since(Instant::now()) >= grace)
    }
}

/// Vault client with Kubernetes auth and transient-failure retries.
///
/// Authentication is explicit: the client never logs in on its own, it
/// reports staleness through [`SecretStore::is_authenticated`] and waits for
/// an [`SecretStore::authenticate`] call. The lease manager uses that to
/// authenticate at most once per refresh cycle.
pub struct VaultClient {
    config: VaultConfig,
    http: Client,
    retry: RetryPolicy,
    auth: RwLock<Option<AuthToken>>,
}

impl VaultClient {
    /// Create a client for the configured Vault server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the underlying HTTP client cannot be
    /// built.
    pub fn new(config: VaultConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(Error::Http)?;

        let retry = RetryPolicy::new(
            RetryConfig::default()
                .with_max_retries(config.max_retries)
                .with_initial_delay(config.retry_delay),
        );

        Ok(Self {
            config,
            http,
            retry,
            auth: RwLock::new(None),
        })
    }

    async fn login(&self, token: &str, role: &str) -> Result<()> {
        let url = format!(
            "{}/v1/auth/{}/login",
            self.config.addr,
            self.config.auth_mount.trim_matches('/')
        );
        let body = serde_json::json!({
            "role": role,
            "jwt": token.trim()
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::unavailable(e.to_string()))?;

        let status = response.status();
        match status.as_u16() {
            429 => return Err(Error::RateLimited),
            s if s >= 500 => {
                let text = response.text().await.unwrap_or_default();
                return Err(Error::unavailable(format!("status {status}: {text}")));
            }
            _ if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();
                return Err(Error::auth_failed(format!("status {status}: {text}")));
            }
            _ => {}
        }

        let text = response.text().await.map_err(Error::Http)?;
        let parsed: AuthResponse = serde_json::from_str(&text)
            .map_err(|e| Error::malformed(format!("login: {e}")))?;

        let ttl = parsed.auth.lease_duration;
        let expires_at = (ttl > 0)
            .then(|| Instant::now().checked_add(Duration::from_secs(ttl)))
            .flatten();

        *self.auth.write().await = Some(AuthToken {
            client_token: parsed.auth.client_token,
            expires_at,
        });

        info!(ttl_secs = ttl, "authenticated with Vault");
        Ok(())
    }

    /// The current session token, without any implicit login.
    async fn bearer(&self) -> Result<String> {
        self.auth
            .read()
            .await
            .as_ref()
            .map(|t| t.client_token.clone())
            .ok_or_else(|| Error::auth_failed("no session established"))
    }

    /// Map the response status, returning the body of a successful one.
    async fn read_success(response: reqwest::Response, path: &str) -> Result<String> {
        let status = response.status();
        match status.as_u16() {
            404 => return Err(Error::not_found(path)),
            403 => return Err(Error::PermissionDenied(path.to_string())),
            429 => return Err(Error::RateLimited),
            _ if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();
                return Err(Error::unavailable(format!("status {status}: {text}")));
            }
            _ => {}
        }

        response.text().await.map_err(Error::Http)
    }

    /// GET `path` and decode the body, keeping transport failures distinct
    /// from undecodable bodies.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.bearer().await?;
        let url = format!("{}/v1/{}", self.config.addr, path);

        let response = self
            .http
            .get(&url)
            .header("X-Vault-Token", token)
            .send()
            .await
            .map_err(|e| Error::unavailable(e.to_string()))?;

        let body = Self::read_success(response, path).await?;
        serde_json::from_str(&body).map_err(|e| Error::malformed(format!("{path}: {e}")))
    }

    /// PUT `body` to `path` and decode the response.
    async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let token = self.bearer().await?;
        let url = format!("{}/v1/{}", self.config.addr, path);

        let response = self
            .http
            .put(&url)
            .header("X-Vault-Token", token)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::unavailable(e.to_string()))?;

        let text = Self::read_success(response, path).await?;
        serde_json::from_str(&text).map_err(|e| Error::malformed(format!("{path}: {e}")))
    }

    async fn aws_creds(&self, role: &str, mount_point: &str) -> Result<SecretHandle> {
        let path = mount_path(mount_point, &format!("creds/{role}"));
        debug!(path, "issuing AWS credentials");

        let response: AwsCredsResponse = self.get_json(&path).await?;
        Ok(SecretHandle::new(
            SecretValue::pair(response.data.access_key, response.data.secret_key),
            Utc::now(),
            response.lease_id,
            response.lease_duration,
            response.renewable,
        ))
    }

    async fn database_creds(&self, role: &str, mount_point: &str) -> Result<SecretHandle> {
        let path = mount_path(mount_point, &format!("creds/{role}"));
        debug!(path, "issuing database credentials");

        let response: DatabaseCredsResponse = self.get_json(&path).await?;
        Ok(SecretHandle::new(
            SecretValue::pair(response.data.username, response.data.password),
            Utc::now(),
            response.lease_id,
            response.lease_duration,
            response.renewable,
        ))
    }

    async fn kv_secret(&self, path: &str, key: &str, mount_point: &str) -> Result<SecretHandle> {
        let full = mount_path(mount_point, &format!("data/{path}"));
        debug!(path = full, key, "reading key/value secret");

        let response: KvResponse = self.get_json(&full).await?;
        let value = response
            .data
            .data
            .get(key)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| Error::malformed(format!("{full}: no string field {key:?}")))?;

        Ok(SecretHandle::new(
            SecretValue::single(value),
            Utc::now(),
            response.lease_id,
            response.lease_duration,
            response.renewable,
        ))
    }

    async fn renew_lease(&self, lease_id: &str, increment_secs: u64) -> Result<LeaseRenewal> {
        let body = serde_json::json!({
            "lease_id": lease_id,
            "increment": increment_secs
        });
        debug!(lease_id, increment_secs, "renewing lease");

        self.put_json("sys/leases/renew", &body).await
    }
}

/// Join a mount point and an engine path without doubling separators.
///
/// A mount point that is empty after trimming contributes no segment, so
/// the joined path never starts with a separator of its own.
fn mount_path(mount_point: &str, rest: &str) -> String {
    let mount = mount_point.trim_matches('/');
    let rest = rest.trim_start_matches('/');
    if mount.is_empty() {
        rest.to_string()
    } else {
        format!("{mount}/{rest}")
    }
}

#[async_trait]
impl SecretStore for VaultClient {
    async fn is_authenticated(&self) -> bool {
        self.auth
            .read()
            .await
            .as_ref()
            .is_some_and(|t| t.fresh(self.config.grace_period))
    }

    #[instrument(skip(self, token))]
    async fn authenticate(&self, token: &str, role: &str) -> Result<()> {
        self.retry.execute(|| self.login(token, role)).await
    }

    #[instrument(skip(self))]
    async fn fetch_aws(&self, role: &str, mount_point: &str) -> Result<SecretHandle> {
        self.retry
            .execute(|| self.aws_creds(role, mount_point))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_database(&self, role: &str, mount_point: &str) -> Result<SecretHandle> {
        self.retry
            .execute(|| self.database_creds(role, mount_point))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_generic(
        &self,
        path: &str,
        key: &str,
        mount_point: &str,
    ) -> Result<SecretHandle> {
        self.retry
            .execute(|| self.kv_secret(path, key, mount_point))
            .await
    }

    #[instrument(skip(self))]
    async fn renew(&self, lease_id: &str, increment_secs: u64) -> Result<LeaseRenewal> {
        self.retry
            .execute(|| self.renew_lease(lease_id, increment_secs))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_path_joins_cleanly() {
        assert_eq!(mount_path("aws/", "creds/writer"), "aws/creds/writer");
        assert_eq!(mount_path("aws", "creds/writer"), "aws/creds/writer");
        assert_eq!(
            mount_path("secret/", "/data/services/billing"),
            "secret/data/services/billing"
        );
    }

    #[test]
    fn test_degenerate_mounts_leave_no_empty_segment() {
        assert_eq!(mount_path("", "creds/writer"), "creds/writer");
        assert_eq!(mount_path("/", "creds/writer"), "creds/writer");
        assert_eq!(mount_path("//", "data/services/billing"), "data/services/billing");
    }

    #[test]
    fn test_token_freshness() {
        let grace = Duration::from_secs(300);

        let no_expiry = AuthToken {
            client_token: "t".to_string(),
            expires_at: None,
        };
        assert!(no_expiry.fresh(grace));

        let plenty = AuthToken {
            client_token: "t".to_string(),
            expires_at: Instant::now().checked_add(Duration::from_secs(3600)),
        };
        assert!(plenty.fresh(grace));

        let inside_grace = AuthToken {
            client_token: "t".to_string(),
            expires_at: Instant::now().checked_add(Duration::from_secs(30)),
        };
        assert!(!inside_grace.fresh(grace));
    }
}
