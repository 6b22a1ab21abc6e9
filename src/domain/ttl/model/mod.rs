pub mod column_ttl_result;
pub mod expiry_projection;
pub mod histogram_row;
pub mod ttl_table_entry;
pub mod schema_ttl_report;
