pub mod expiry_projector;
pub mod file_ttl_service;
pub mod histogram_report_parser;
pub mod identifier_guard;
pub mod live_schema_ttl_fetcher;
pub mod live_ttl_service;
pub mod multi_column_ttl_scanner;
pub mod probe_target_catalog;
pub mod schema_ttl_extractor;
pub mod text_decoder;
pub mod ttl_scan_exporter;
