//! Query-string DTOs for the TTL endpoints

use serde::Deserialize;

use crate::domain::ttl::service::schema_ttl_extractor::SchemaMatchMode;

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SchemaUploadQuery {
    pub mode: Option<SchemaMatchMode>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ProjectionQuery {
    pub title: Option<String>,
}
