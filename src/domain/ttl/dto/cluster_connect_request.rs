use serde::Deserialize;
use validator::Validate;

use crate::core::client::scylla_executor::ClusterEndpoint;

fn default_port() -> u16 {
    9042
}

/// Connection form values. The password is handed to the driver and then dropped.
#[derive(Clone, Deserialize, Validate)]
pub struct ClusterConnectRequest {
    #[validate(length(min = 1, max = 253))]
    pub host: String,
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ClusterConnectRequest {
    pub fn into_endpoint(self) -> ClusterEndpoint {
        ClusterEndpoint {
            host: self.host.trim().to_string(),
            port: self.port,
            username: self.username,
            password: self.password,
        }
    }
}

impl std::fmt::Debug for ClusterConnectRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterConnectRequest")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
