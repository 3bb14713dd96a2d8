//! Declarative table of the remote operations the CLI consumes.
//!
//! # Design
//! - Each [`Operation`] fixes the verb, path template, success status, and
//!   request body fields of one endpoint; the client builds requests from it.
//! - [`OPENAPI_DOCUMENT`] is the backend's published contract. Tests decode it
//!   and check it against [`OPERATIONS`] in both directions.

use serde_json::Value;

/// Backend contract document (`OpenAPI` 3) the operation table is checked against.
pub const OPENAPI_DOCUMENT: &str = include_str!("../openapi.json");

/// HTTP verbs used by the DevDB API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Lower-case key used for operations in an `OpenAPI` path item.
    #[must_use]
    pub const fn openapi_key(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }
}

/// One remote operation of the DevDB API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Stable identifier matching the `operationId` in the contract document.
    pub id: &'static str,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path template; `{param}` segments are substituted in order.
    pub path: &'static str,
    /// The only status code treated as success.
    pub success_status: u16,
    /// Top-level JSON fields of the request body, empty when there is none.
    pub request_fields: &'static [&'static str],
}

impl Operation {
    /// Names of the `{param}` placeholders in the path template, in order.
    #[must_use]
    pub fn path_params(&self) -> Vec<&'static str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
            .collect()
    }
}

/// `POST /projects`
pub const CREATE_PROJECT: Operation = Operation {
    id: "createProject",
    method: HttpMethod::Post,
    path: "/projects",
    success_status: 201,
    request_fields: &["owner", "name", "dbType", "dbVersion"],
};

/// `GET /projects`
pub const LIST_PROJECTS: Operation = Operation {
    id: "listProjects",
    method: HttpMethod::Get,
    path: "/projects",
    success_status: 200,
    request_fields: &[],
};

/// `GET /projects/{id}`
pub const SHOW_PROJECT: Operation = Operation {
    id: "showProject",
    method: HttpMethod::Get,
    path: "/projects/{id}",
    success_status: 200,
    request_fields: &[],
};

/// `DELETE /projects/{id}`
pub const DELETE_PROJECT: Operation = Operation {
    id: "deleteProject",
    method: HttpMethod::Delete,
    path: "/projects/{id}",
    success_status: 200,
    request_fields: &[],
};

/// `POST /projects/{projectId}/databases`
pub const CREATE_DATABASE: Operation = Operation {
    id: "createDatabase",
    method: HttpMethod::Post,
    path: "/projects/{projectId}/databases",
    success_status: 201,
    request_fields: &["name"],
};

/// `GET /projects/{projectId}/databases`
pub const LIST_DATABASES: Operation = Operation {
    id: "listDatabases",
    method: HttpMethod::Get,
    path: "/projects/{projectId}/databases",
    success_status: 200,
    request_fields: &[],
};

/// `GET /projects/{projectId}/databases/{name}`
pub const SHOW_DATABASE: Operation = Operation {
    id: "showDatabase",
    method: HttpMethod::Get,
    path: "/projects/{projectId}/databases/{name}",
    success_status: 200,
    request_fields: &[],
};

/// `DELETE /projects/{projectId}/databases/{name}`
pub const DELETE_DATABASE: Operation = Operation {
    id: "deleteDatabase",
    method: HttpMethod::Delete,
    path: "/projects/{projectId}/databases/{name}",
    success_status: 200,
    request_fields: &[],
};

/// `PUT /config`
pub const UPDATE_SERVER_CONFIG: Operation = Operation {
    id: "updateServerConfig",
    method: HttpMethod::Put,
    path: "/config",
    success_status: 200,
    request_fields: &[
        "POSTGRES_IMAGE",
        "POSTGRES_DB",
        "POSTGRES_USER",
        "POSTGRES_PASSWORD",
        "BACKUP_LOCATION_URL",
    ],
};

/// Every operation the CLI issues.
pub const OPERATIONS: &[Operation] = &[
    CREATE_PROJECT,
    LIST_PROJECTS,
    SHOW_PROJECT,
    DELETE_PROJECT,
    CREATE_DATABASE,
    LIST_DATABASES,
    SHOW_DATABASE,
    DELETE_DATABASE,
    UPDATE_SERVER_CONFIG,
];

/// Look up an operation by its `operationId`.
#[must_use]
pub fn operation_by_id(id: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.id == id)
}

/// Decode the embedded contract document.
///
/// # Errors
///
/// Returns an error if the embedded document is not valid JSON.
pub fn openapi_document() -> serde_json::Result<Value> {
    serde_json::from_str(OPENAPI_DOCUMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_params_follow_template_order() {
        assert_eq!(SHOW_DATABASE.path_params(), vec!["projectId", "name"]);
        assert_eq!(SHOW_PROJECT.path_params(), vec!["id"]);
        assert!(LIST_PROJECTS.path_params().is_empty());
    }

    #[test]
    fn operation_ids_are_unique() {
        for (index, op) in OPERATIONS.iter().enumerate() {
            assert!(
                OPERATIONS[index + 1..].iter().all(|other| other.id != op.id),
                "duplicate operation id {}",
                op.id
            );
        }
    }

    #[test]
    fn creates_succeed_with_201_and_everything_else_with_200() {
        for op in OPERATIONS {
            let expected = if op.id.starts_with("create") { 201 } else { 200 };
            assert_eq!(op.success_status, expected, "{}", op.id);
        }
    }

    #[test]
    fn operation_by_id_finds_entries() {
        assert_eq!(operation_by_id("deleteDatabase"), Some(&DELETE_DATABASE));
        assert!(operation_by_id("listSnapshots").is_none());
    }
}
