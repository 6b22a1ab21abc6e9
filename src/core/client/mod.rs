// CQL driver seam
pub mod cql_executor;
pub mod cql_connector;
pub mod scylla_executor;

#[cfg(test)]
pub mod recording_executor;
