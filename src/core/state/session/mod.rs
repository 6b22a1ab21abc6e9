pub mod cluster_session;
pub mod cluster_session_registry;
