use std::sync::Arc;

use mediaforge_providers::Providers;
use mediaforge_storage::persist::ArtifactPersister;
use mediaforge_storage::supabase::SupabaseStore;
use mediaforge_storage::ObjectStore;

use crate::config::{ServerConfig, StorageConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: mediaforge_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Shared HTTP client (dispatch forwarding and downloads).
    pub http: reqwest::Client,
    /// Provider API clients.
    pub providers: Arc<Providers>,
    /// Copies provider output into durable storage.
    pub persister: ArtifactPersister,
}

impl AppState {
    /// Build state with the object store selected by `config.storage`.
    pub fn new(pool: mediaforge_db::DbPool, config: ServerConfig) -> Self {
        let http = reqwest::Client::new();
        let persister = match object_store_from_config(&config.storage, http.clone()) {
            Some(store) => ArtifactPersister::new(http.clone(), store),
            None => ArtifactPersister::disabled(http.clone()),
        };
        Self::with_persister(pool, config, http, persister)
    }

    /// Build state around an explicit object store.
    pub fn with_store(
        pool: mediaforge_db::DbPool,
        config: ServerConfig,
        http: reqwest::Client,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let persister = ArtifactPersister::new(http.clone(), store);
        Self::with_persister(pool, config, http, persister)
    }

    fn with_persister(
        pool: mediaforge_db::DbPool,
        config: ServerConfig,
        http: reqwest::Client,
        persister: ArtifactPersister,
    ) -> Self {
        let providers = Arc::new(Providers::new(http.clone(), &config.providers));
        Self {
            pool,
            config: Arc::new(config),
            http,
            providers,
            persister,
        }
    }
}

/// Supabase when URL and service key are configured, nothing otherwise.
fn object_store_from_config(
    storage: &StorageConfig,
    http: reqwest::Client,
) -> Option<Arc<dyn ObjectStore>> {
    match (&storage.supabase_url, &storage.service_key) {
        (Some(url), Some(key)) => {
            tracing::info!(bucket = %storage.bucket, "Using Supabase storage");
            Some(Arc::new(SupabaseStore::new(http, url, key, &storage.bucket)))
        }
        _ => {
            tracing::warn!(
                "Supabase storage not configured, responses carry provider URLs unpersisted"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(url: Option<&str>, key: Option<&str>) -> StorageConfig {
        StorageConfig {
            supabase_url: url.map(str::to_string),
            service_key: key.map(str::to_string),
            bucket: "media".into(),
        }
    }

    #[test]
    fn store_requires_url_and_service_key() {
        let http = reqwest::Client::new();
        let url = Some("https://proj.supabase.co");

        assert!(object_store_from_config(&storage(url, None), http.clone()).is_none());
        assert!(object_store_from_config(&storage(None, Some("k")), http.clone()).is_none());
        assert!(object_store_from_config(&storage(url, Some("k")), http).is_some());
    }
}
