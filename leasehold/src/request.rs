//! Declarative descriptions of the secrets a workload needs.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_aws_mount() -> String {
    "aws/".to_string()
}

fn default_database_mount() -> String {
    "database/".to_string()
}

fn default_generic_mount() -> String {
    "secret/".to_string()
}

/// One secret a workload declares up front.
///
/// Each variant names the engine that issues it and carries everything needed
/// to fetch and publish it. `name` is the key the secret is published under
/// and doubles as the cache key; `minimum_ttl` is a floor in seconds below
/// which an existing value is reused even when its lease has lapsed, to keep
/// tight leases from churning credentials on every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SecretRequest {
    /// Dynamic AWS credentials issued for an IAM role.
    Aws {
        /// Publication name; the credential pair is published under
        /// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` regardless, so this
        /// only identifies the request.
        name: String,
        /// Vault role the credentials are issued for.
        role: String,
        /// Mount point of the AWS engine.
        #[serde(default = "default_aws_mount")]
        mount_point: String,
        /// Reuse floor in seconds.
        #[serde(default)]
        minimum_ttl: u64,
    },
    /// Dynamic database credentials rendered as a connection URI.
    Database {
        /// Publication name.
        name: String,
        /// Vault role the account is created for.
        role: String,
        /// URI scheme, e.g. `postgresql`.
        engine: String,
        /// Database server hostname.
        host: String,
        /// Database server port.
        port: u16,
        /// Database to connect to.
        database: String,
        /// Query string appended verbatim after `?`.
        params: String,
        /// Mount point of the database engine.
        #[serde(default = "default_database_mount")]
        mount_point: String,
        /// Reuse floor in seconds.
        #[serde(default)]
        minimum_ttl: u64,
    },
    /// One field of a static key/value secret.
    Generic {
        /// Publication name.
        name: String,
        /// Path below the mount point.
        path: String,
        /// Field to extract from the secret's data.
        key: String,
        /// Mount point of the key/value engine.
        #[serde(default = "default_generic_mount")]
        mount_point: String,
        /// Reuse floor in seconds.
        #[serde(default)]
        minimum_ttl: u64,
    },
}

impl SecretRequest {
    /// Describe dynamic AWS credentials for `role`.
    #[must_use]
    pub fn aws(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self::Aws {
            name: name.into(),
            role: role.into(),
            mount_point: default_aws_mount(),
            minimum_ttl: 0,
        }
    }

    /// Describe dynamic database credentials for `role`, rendered against the
    /// given server coordinates.
    #[must_use]
    pub fn database(
        name: impl Into<String>,
        role: impl Into<String>,
        engine: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        params: impl Into<String>,
    ) -> Self {
        Self::Database {
            name: name.into(),
            role: role.into(),
            engine: engine.into(),
            host: host.into(),
            port,
            database: database.into(),
            params: params.into(),
            mount_point: default_database_mount(),
            minimum_ttl: 0,
        }
    }

    /// Describe one field of a static key/value secret.
    #[must_use]
    pub fn generic(
        name: impl Into<String>,
        path: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::Generic {
            name: name.into(),
            path: path.into(),
            key: key.into(),
            mount_point: default_generic_mount(),
            minimum_ttl: 0,
        }
    }

    /// Set the reuse floor in seconds.
    #[must_use]
    pub fn with_minimum_ttl(mut self, seconds: u64) -> Self {
        match &mut self {
            Self::Aws { minimum_ttl, .. }
            | Self::Database { minimum_ttl, .. }
            | Self::Generic { minimum_ttl, .. } => *minimum_ttl = seconds,
        }
        self
    }

    /// Override the engine mount point.
    #[must_use]
    pub fn with_mount_point(mut self, mount: impl Into<String>) -> Self {
        match &mut self {
            Self::Aws { mount_point, .. }
            | Self::Database { mount_point, .. }
            | Self::Generic { mount_point, .. } => *mount_point = mount.into(),
        }
        self
    }

    /// The name the secret is published and cached under.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Aws { name, .. } | Self::Database { name, .. } | Self::Generic { name, .. } => {
                name
            }
        }
    }

    /// The reuse floor in seconds.
    #[must_use]
    pub const fn minimum_ttl(&self) -> u64 {
        match self {
            Self::Aws { minimum_ttl, .. }
            | Self::Database { minimum_ttl, .. }
            | Self::Generic { minimum_ttl, .. } => *minimum_ttl,
        }
    }

    /// The engine mount point.
    #[must_use]
    pub fn mount_point(&self) -> &str {
        match self {
            Self::Aws { mount_point, .. }
            | Self::Database { mount_point, .. }
            | Self::Generic { mount_point, .. } => mount_point,
        }
    }

    /// Parse a JSON array of requests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the list cannot be deserialized, which
    /// includes unknown `type` tags and missing fields.
    pub fn parse_many(json: &str) -> Result<Vec<Self>> {
        serde_json::from_str(json)
            .map_err(|e| Error::config(format!("invalid secret request list: {e}")))
    }
}

impl fmt::Display for SecretRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aws {
                mount_point, role, ..
            } => write!(f, "aws:{mount_point}:{role}"),
            Self::Database {
                mount_point,
                engine,
                role,
                ..
            } => write!(f, "database:{mount_point}:{engine}:{role}"),
            Self::Generic {
                mount_point,
                path,
                key,
                ..
            } => write!(f, "generic:{mount_point}:{path}:{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fills_defaults() {
        let json = r#"[
            {"type": "aws", "name": "s3_writer", "role": "writer"},
            {"type": "generic", "name": "api_key", "path": "services/billing", "key": "token"}
        ]"#;
        let requests = SecretRequest::parse_many(json).unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].mount_point(), "aws/");
        assert_eq!(requests[0].minimum_ttl(), 0);
        assert_eq!(requests[1].mount_point(), "secret/");
        assert_eq!(requests[1].name(), "api_key");
    }

    #[test]
    fn test_parse_database_with_overrides() {
        let json = r#"[{
            "type": "database",
            "name": "orders_db",
            "role": "orders-rw",
            "engine": "postgresql",
            "host": "db.internal",
            "port": 5432,
            "database": "orders",
            "params": "sslmode=require",
            "mount_point": "database-eu/",
            "minimum_ttl": 300
        }]"#;
        let requests = SecretRequest::parse_many(json).unwrap();

        let SecretRequest::Database {
            port, minimum_ttl, ..
        } = &requests[0]
        else {
            panic!("expected a database request");
        };
        assert_eq!(*port, 5432);
        assert_eq!(*minimum_ttl, 300);
        assert_eq!(requests[0].mount_point(), "database-eu/");
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let json = r#"[{"type": "consul", "name": "x"}]"#;
        let err = SecretRequest::parse_many(json).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let json = r#"[{"type": "aws", "name": "s3_writer"}]"#;
        assert!(SecretRequest::parse_many(json).is_err());
    }

    #[test]
    fn test_display_identifies_the_request() {
        assert_eq!(
            SecretRequest::aws("s3", "writer").to_string(),
            "aws:aws/:writer"
        );
        assert_eq!(
            SecretRequest::database("db", "rw", "postgresql", "h", 5432, "orders", "")
                .to_string(),
            "database:database/:postgresql:rw"
        );
        assert_eq!(
            SecretRequest::generic("k", "services/billing", "token").to_string(),
            "generic:secret/:services/billing:token"
        );
    }

    #[test]
    fn test_builders() {
        let request = SecretRequest::aws("s3", "writer")
            .with_minimum_ttl(600)
            .with_mount_point("aws-us-east-1/");
        assert_eq!(request.minimum_ttl(), 600);
        assert_eq!(request.mount_point(), "aws-us-east-1/");
    }
}
