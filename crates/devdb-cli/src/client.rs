//! HTTP resource client, error types, and the handler context.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;
use devdb_api_models::contract::{
    CREATE_DATABASE, CREATE_PROJECT, DELETE_DATABASE, DELETE_PROJECT, LIST_DATABASES,
    LIST_PROJECTS, SHOW_DATABASE, SHOW_PROJECT, UPDATE_SERVER_CONFIG,
};
use devdb_api_models::{
    Ack, CreateDatabaseRequest, CreateProjectRequest, Database, DatabaseType, HttpMethod,
    Operation, Project, ServerConfigUpdate,
};
use devdb_config::ResolvedApiUrl;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::cli::OutputFormat;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type separating usage mistakes from remote and local failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Usage(String),
    Api(ApiError),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Api(_) | Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Usage(message) => message.clone(),
            Self::Api(error) => error.to_string(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}

/// Broad failure classes reported by the resource client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// The server answered with a status other than the expected one.
    Remote,
    /// The exchange itself failed or produced an unusable body.
    Transport,
}

/// Failures raised while talking to the DevDB API.
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("API returned status code {status}")]
    Remote { status: u16 },
    #[error("error {action}: {source}")]
    Transport {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("error decoding {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("API URL {url} cannot be used as a base for resource paths")]
    InvalidBaseUrl { url: String },
    #[error("{value:?} cannot be used as a path segment")]
    InvalidPathSegment { value: String },
    #[error("{operation} takes {expected} path parameter(s), got {given}")]
    PathArity {
        operation: &'static str,
        expected: usize,
        given: usize,
    },
}

impl ApiError {
    pub(crate) const fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Remote { .. } => ApiErrorKind::Remote,
            Self::Transport { .. }
            | Self::Decode { .. }
            | Self::NotFound { .. }
            | Self::InvalidBaseUrl { .. }
            | Self::InvalidPathSegment { .. }
            | Self::PathArity { .. } => ApiErrorKind::Transport,
        }
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) client: ResourceClient,
    pub(crate) output: OutputFormat,
    pub(crate) current_user: Option<String>,
    pub(crate) api_url: ResolvedApiUrl,
    pub(crate) config_path: Option<PathBuf>,
}

/// Typed operation set of the DevDB API. Every method performs one round trip.
#[derive(Clone)]
pub(crate) struct ResourceClient {
    http: Client,
    base_url: Url,
}

impl ResourceClient {
    /// Build a client for `base_url`; `timeout` bounds each request when set.
    pub(crate) fn new(base_url: Url, timeout: Option<Duration>) -> CliResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;
        Ok(Self::with_client(http, base_url))
    }

    pub(crate) const fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub(crate) async fn create_project(
        &self,
        owner: &str,
        name: &str,
        db_type: DatabaseType,
        db_version: &str,
    ) -> Result<Project, ApiError> {
        let body = CreateProjectRequest {
            owner: owner.to_string(),
            name: name.to_string(),
            db_type,
            db_version: db_version.to_string(),
        };
        let url = self.endpoint(&CREATE_PROJECT, &[])?;
        let bytes = self
            .exchange(&CREATE_PROJECT, "creating project", url, Some(&body))
            .await?;
        decode(&bytes, "project")
    }

    pub(crate) async fn list_projects(&self, owner: Option<&str>) -> Result<Vec<Project>, ApiError> {
        let mut url = self.endpoint(&LIST_PROJECTS, &[])?;
        if let Some(owner) = owner {
            url.query_pairs_mut().append_pair("owner", owner);
        }
        let bytes = self
            .exchange(&LIST_PROJECTS, "listing projects", url, None::<&()>)
            .await?;
        decode_list(&bytes, "project list")
    }

    pub(crate) async fn show_project(&self, id: &str) -> Result<Project, ApiError> {
        let url = self.endpoint(&SHOW_PROJECT, &[id])?;
        let bytes = self
            .exchange(&SHOW_PROJECT, "getting project", url, None::<&()>)
            .await?;
        decode_present(&bytes, "project", "project")
    }

    pub(crate) async fn delete_project(&self, id: &str) -> Result<Ack, ApiError> {
        let url = self.endpoint(&DELETE_PROJECT, &[id])?;
        self.exchange(&DELETE_PROJECT, "deleting project", url, None::<&()>)
            .await?;
        Ok(Ack)
    }

    pub(crate) async fn create_database(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<Database, ApiError> {
        let body = CreateDatabaseRequest {
            name: name.to_string(),
        };
        let url = self.endpoint(&CREATE_DATABASE, &[project_id])?;
        let bytes = self
            .exchange(&CREATE_DATABASE, "creating database", url, Some(&body))
            .await?;
        decode(&bytes, "database")
    }

    pub(crate) async fn list_databases(&self, project_id: &str) -> Result<Vec<Database>, ApiError> {
        let url = self.endpoint(&LIST_DATABASES, &[project_id])?;
        let bytes = self
            .exchange(&LIST_DATABASES, "listing databases", url, None::<&()>)
            .await?;
        decode_list(&bytes, "database list")
    }

    pub(crate) async fn show_database(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<Database, ApiError> {
        let url = self.endpoint(&SHOW_DATABASE, &[project_id, name])?;
        let bytes = self
            .exchange(&SHOW_DATABASE, "getting database", url, None::<&()>)
            .await?;
        decode_present(&bytes, "database", "database")
    }

    pub(crate) async fn delete_database(&self, project_id: &str, name: &str) -> Result<Ack, ApiError> {
        let url = self.endpoint(&DELETE_DATABASE, &[project_id, name])?;
        self.exchange(&DELETE_DATABASE, "deleting database", url, None::<&()>)
            .await?;
        Ok(Ack)
    }

    pub(crate) async fn update_server_config(
        &self,
        settings: &ServerConfigUpdate,
    ) -> Result<Ack, ApiError> {
        let url = self.endpoint(&UPDATE_SERVER_CONFIG, &[])?;
        self.exchange(
            &UPDATE_SERVER_CONFIG,
            "updating configuration",
            url,
            Some(settings),
        )
        .await?;
        Ok(Ack)
    }

    /// Expand an operation's path template beneath the base URL.
    ///
    /// Parameters fill `{...}` placeholders in order and are percent-encoded as
    /// single path segments. Empty and dot-segment values are rejected since the
    /// URL parser would drop or collapse them into a different resource path.
    pub(crate) fn endpoint(&self, op: &Operation, params: &[&str]) -> Result<Url, ApiError> {
        let expected = op.path_params().len();
        if expected != params.len() {
            return Err(ApiError::PathArity {
                operation: op.id,
                expected,
                given: params.len(),
            });
        }
        if let Some(value) = params.iter().find(|value| !is_path_segment(value)) {
            return Err(ApiError::InvalidPathSegment {
                value: (*value).to_string(),
            });
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                })?;
            segments.pop_if_empty();
            let mut values = params.iter();
            for segment in op.path.split('/').filter(|segment| !segment.is_empty()) {
                if segment.starts_with('{') {
                    if let Some(value) = values.next() {
                        segments.push(value);
                    }
                } else {
                    segments.push(segment);
                }
            }
        }
        Ok(url)
    }

    async fn exchange<B: Serialize + ?Sized>(
        &self,
        op: &Operation,
        action: &'static str,
        url: Url,
        body: Option<&B>,
    ) -> Result<Vec<u8>, ApiError> {
        debug!(operation = op.id, method = op.method.as_str(), %url, "sending request");
        let mut request = self.request(op.method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport { action, source })?;
        let status = response.status().as_u16();
        debug!(operation = op.id, status, "received response");
        if status != op.success_status {
            return Err(ApiError::Remote { status });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { action, source })?;
        Ok(bytes.to_vec())
    }

    fn request(&self, method: HttpMethod, url: Url) -> RequestBuilder {
        let method = match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };
        self.http
            .request(method, url)
            .header(HEADER_REQUEST_ID, Uuid::new_v4().to_string())
    }
}

/// Whether `value` survives as one literal segment of a URL path.
///
/// `%2E` spellings count as dots too, matching how URL parsers normalise them.
pub(crate) fn is_path_segment(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase().replace("%2e", ".");
    !value.trim().is_empty() && !matches!(lowered.as_str(), "." | "..")
}

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &'static str) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|source| ApiError::Decode { what, source })
}

/// Decode a single resource where a `null` body means the resource is gone.
fn decode_present<T: DeserializeOwned>(
    bytes: &[u8],
    what: &'static str,
    resource: &'static str,
) -> Result<T, ApiError> {
    decode::<Option<T>>(bytes, what)?.ok_or(ApiError::NotFound { resource })
}

/// Decode a collection; `null`, `[]`, and blank bodies are all empty.
fn decode_list<T: DeserializeOwned>(bytes: &[u8], what: &'static str) -> Result<Vec<T>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(decode::<Option<Vec<T>>>(bytes, what)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(base: &str) -> ResourceClient {
        ResourceClient::with_client(Client::new(), base.parse().expect("valid URL"))
    }

    #[test]
    fn endpoint_percent_encodes_path_parameters() -> Result<(), ApiError> {
        let client = client_for("http://127.0.0.1:5000");
        let url = client.endpoint(&SHOW_DATABASE, &["team/a", "main db"])?;
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5000/projects/team%2Fa/databases/main%20db"
        );
        Ok(())
    }

    #[test]
    fn endpoint_rejects_segments_the_url_parser_would_drop() {
        let client = client_for("http://127.0.0.1:5000");
        for value in ["", " ", ".", "..", "%2e", ".%2E"] {
            let err = client
                .endpoint(&DELETE_PROJECT, &[value])
                .expect_err("dot and blank segments change the target path");
            assert!(
                matches!(err, ApiError::InvalidPathSegment { value: ref v } if v == value),
                "{value:?}"
            );
        }
        let err = client
            .endpoint(&DELETE_DATABASE, &["p1", ".."])
            .expect_err("database name is a dot segment");
        assert_eq!(err.to_string(), r#"".." cannot be used as a path segment"#);
    }

    #[test]
    fn endpoint_keeps_dots_inside_a_segment() -> Result<(), ApiError> {
        let client = client_for("http://127.0.0.1:5000");
        let url = client.endpoint(&SHOW_DATABASE, &["p.1", "..."])?;
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/projects/p.1/databases/...");
        Ok(())
    }

    #[test]
    fn endpoint_rejects_parameter_count_mismatch() {
        let client = client_for("http://127.0.0.1:5000");
        let err = client
            .endpoint(&SHOW_DATABASE, &["p1"])
            .expect_err("database name is missing");
        assert!(matches!(
            err,
            ApiError::PathArity {
                operation: "showDatabase",
                expected: 2,
                given: 1
            }
        ));
        assert!(client.endpoint(&LIST_PROJECTS, &["extra"]).is_err());
    }

    #[test]
    fn endpoint_keeps_base_path() -> Result<(), ApiError> {
        let client = client_for("https://gw.example/devdb/v1");
        let url = client.endpoint(&LIST_DATABASES, &["p1"])?;
        assert_eq!(url.as_str(), "https://gw.example/devdb/v1/projects/p1/databases");

        let client = client_for("https://gw.example/devdb/v1/");
        let url = client.endpoint(&UPDATE_SERVER_CONFIG, &[])?;
        assert_eq!(url.as_str(), "https://gw.example/devdb/v1/config");
        Ok(())
    }

    #[test]
    fn decode_list_treats_null_and_blank_as_empty() -> Result<(), ApiError> {
        assert!(decode_list::<Database>(b"null", "database list")?.is_empty());
        assert!(decode_list::<Database>(b"[]", "database list")?.is_empty());
        assert!(decode_list::<Database>(b" \n", "database list")?.is_empty());
        assert!(decode_list::<Database>(b"", "database list")?.is_empty());
        Ok(())
    }

    #[test]
    fn decode_present_maps_null_to_not_found() {
        let err = decode_present::<Project>(b"null", "project", "project").unwrap_err();
        assert_eq!(err.to_string(), "project not found");
        assert_eq!(err.kind(), ApiErrorKind::Transport);
    }

    #[test]
    fn malformed_bodies_are_transport_failures() {
        let err = decode::<Project>(b"{\"id\": 1", "project").unwrap_err();
        assert!(matches!(err, ApiError::Decode { what: "project", .. }));
        assert_eq!(err.kind(), ApiErrorKind::Transport);
    }

    #[test]
    fn cli_error_exit_codes() {
        assert_eq!(CliError::usage("bad").exit_code(), 2);
        assert_eq!(CliError::from(ApiError::Remote { status: 500 }).exit_code(), 3);
        assert_eq!(CliError::failure(anyhow!("disk full")).exit_code(), 3);
        assert_eq!(
            CliError::from(ApiError::Remote { status: 500 }).display_message(),
            "API returned status code 500"
        );
    }

    #[tokio::test]
    async fn unexpected_status_is_remote_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/projects");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({}));
        });

        let client = client_for(&server.base_url());
        let err = client
            .create_project("alice", "demo", DatabaseType::Postgres, "15")
            .await
            .expect_err("200 is not the documented 201");
        assert!(matches!(err, ApiError::Remote { status: 200 }));
        assert_eq!(err.kind(), ApiErrorKind::Remote);
    }

    #[tokio::test]
    async fn requests_carry_a_request_id() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/projects")
                .query_param("owner", "alice")
                .header_exists(HEADER_REQUEST_ID);
            then.status(200).body("[]");
        });

        let client = client_for(&server.base_url());
        let projects = client
            .list_projects(Some("alice"))
            .await
            .expect("list should succeed");
        assert!(projects.is_empty());
        mock.assert();
    }

    #[tokio::test]
    async fn connection_failures_name_the_action() {
        // Port 9 (discard) is not served on loopback in test environments.
        let client = client_for("http://127.0.0.1:9");
        let err = client
            .delete_project("p1")
            .await
            .expect_err("nothing listens on the discard port");
        assert!(err.to_string().starts_with("error deleting project: "));
        assert_eq!(err.kind(), ApiErrorKind::Transport);
    }
}
