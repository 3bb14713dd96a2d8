#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the DevDB provisioning API.
//!
//! These types are used by the CLI for request/response encoding so the wire
//! contract lives in one place. Fields the backend only fills in once a
//! resource is provisioned are modelled as `Option` and never fail decoding
//! when absent or `null`.

pub mod contract;

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use contract::{HttpMethod, OPENAPI_DOCUMENT, OPERATIONS, Operation};

/// Database engines the backend can provision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL`.
    Postgres,
    /// `MySQL`.
    Mysql,
}

impl DatabaseType {
    /// Wire representation of the engine.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
        }
    }
}

impl Display for DatabaseType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            other => Err(format!(
                "invalid database type \"{other}\" (expected postgres or mysql)"
            )),
        }
    }
}

/// Credentials issued alongside a freshly created project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefaultCredentials {
    /// Login role name.
    pub username: String,
    /// Generated password, when the backend discloses it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Default database name.
    pub database: String,
}

/// A database instance belonging to a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Database {
    /// Name, unique within the owning project.
    pub name: String,
    /// Lifecycle status reported by the backend (`pending`, `running`, ...).
    pub status: String,
    /// Connection host once provisioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Connection port once provisioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Login role once credentials are issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Database name once credentials are issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// A named, owned grouping of databases sharing an engine type and version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Backend-assigned identifier; authoritative for show/delete.
    pub id: String,
    /// Human-facing name, unique per owner.
    pub name: String,
    /// Owning account.
    pub owner: String,
    /// Engine used by every database in the project.
    pub db_type: DatabaseType,
    /// Engine version.
    pub db_version: String,
    /// Location of the backup seeded into new databases; may be empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_location: Option<String>,
    /// Credentials, only present in the creation response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_credentials: Option<DefaultCredentials>,
    /// Databases, only present on detail fetches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<Database>>,
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// Owning account.
    pub owner: String,
    /// Project name.
    pub name: String,
    /// Engine type.
    pub db_type: DatabaseType,
    /// Engine version.
    pub db_version: String,
}

/// Body of `POST /projects/{projectId}/databases`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDatabaseRequest {
    /// Database name.
    pub name: String,
}

/// Body of `PUT /config`, the server-side provisioning defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ServerConfigUpdate {
    /// Container image used for new `PostgreSQL` instances.
    pub postgres_image: String,
    /// Default database name.
    pub postgres_db: String,
    /// Default login role.
    pub postgres_user: String,
    /// Default password.
    pub postgres_password: String,
    /// Where backups are restored from.
    pub backup_location_url: String,
}

/// Acknowledgement of a successful mutation whose body carries no data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ack;
