pub mod cluster_connect_request;
pub mod ttl_scan_request;
