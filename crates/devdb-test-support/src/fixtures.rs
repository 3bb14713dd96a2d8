//! Canned response bodies for stand-in API servers.
//!
//! Values mirror what the backend returns on the wire (camelCase project
//! fields, nullable database connection fields).

use serde_json::{Value, json};

/// Project id used by most fixtures.
pub const PROJECT_ID: &str = "proj-1a2b3c";

/// Body of a successful `POST /projects`.
#[must_use]
pub fn created_project(name: &str, owner: &str) -> Value {
    json!({
        "id": PROJECT_ID,
        "name": name,
        "owner": owner,
        "dbType": "postgres",
        "dbVersion": "15.3",
        "backupLocation": "",
        "defaultCredentials": {
            "username": "postgres",
            "password": "postgres",
            "database": name
        }
    })
}

/// A project summary as returned by `GET /projects`.
#[must_use]
pub fn project_summary(id: &str, name: &str, owner: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "owner": owner,
        "dbType": "mysql",
        "dbVersion": "8.0"
    })
}

/// Project detail with a backup location and the given databases.
#[must_use]
pub fn project_detail(databases: Value) -> Value {
    json!({
        "id": PROJECT_ID,
        "name": "analytics",
        "owner": "testuser",
        "dbType": "postgres",
        "dbVersion": "15.3",
        "backupLocation": "s3://backups/analytics.dump",
        "databases": databases
    })
}

/// A database with every connection field populated.
#[must_use]
pub fn running_database(name: &str) -> Value {
    json!({
        "name": name,
        "status": "running",
        "host": "10.0.0.12",
        "port": 5432,
        "username": "postgres",
        "database": name
    })
}

/// A freshly requested database whose connection fields are not known yet.
#[must_use]
pub fn pending_database(name: &str) -> Value {
    json!({
        "name": name,
        "status": "pending",
        "host": null,
        "port": 0,
        "username": "",
        "database": null
    })
}
