use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use super::cluster_session::{ClusterSession, ClusterSessionInfo};
use crate::errors::{AppError, AppResult};

pub type SharedSession = Arc<Mutex<ClusterSession>>;

/// Owns every open session. Live operations lock a session's mutex for their whole
/// duration, so one connection never serves two operations at once.
#[derive(Default)]
pub struct ClusterSessionRegistry {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl ClusterSessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, session: ClusterSession) -> ClusterSessionInfo {
        let info = session.info();
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::new(Mutex::new(session)));

        info!("Opened session {} to {}", info.session_id, info.endpoint);
        info
    }

    pub async fn get(&self, id: Uuid) -> AppResult<SharedSession> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("session {} is not open", id)))
    }

    /// Remove the session; the driver connection closes once in-flight work releases it.
    pub async fn close(&self, id: Uuid) -> AppResult<()> {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(session) => {
                let endpoint = session.lock().await.endpoint.clone();
                info!("Closed session {} to {}", id, endpoint);
                Ok(())
            }
            None => Err(AppError::NotFound(format!("session {} is not open", id))),
        }
    }

    pub async fn close_all(&self) -> usize {
        let drained: Vec<_> = self.sessions.write().await.drain().collect();
        if !drained.is_empty() {
            info!("Closed {} open session(s)", drained.len());
        }
        drained.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::recording_executor::RecordingExecutor;

    fn session() -> ClusterSession {
        ClusterSession::new(Arc::new(RecordingExecutor::new()), Some("cassandra".into()))
    }

    #[tokio::test]
    async fn open_get_close_lifecycle() {
        let registry = ClusterSessionRegistry::new();
        let info = registry.open(session()).await;

        assert_eq!(info.endpoint, "recording:9042");
        assert!(registry.get(info.session_id).await.is_ok());

        registry.close(info.session_id).await.unwrap();
        let err = registry.get(info.session_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn closing_twice_is_not_found() {
        let registry = ClusterSessionRegistry::new();
        let info = registry.open(session()).await;

        registry.close(info.session_id).await.unwrap();
        assert!(matches!(
            registry.close(info.session_id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn close_all_drains_registry() {
        let registry = ClusterSessionRegistry::new();
        registry.open(session()).await;
        registry.open(session()).await;

        assert_eq!(registry.close_all().await, 2);
        assert_eq!(registry.len().await, 0);
    }
}
