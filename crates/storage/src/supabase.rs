//! Supabase Storage REST client.
//!
//! Uploads go to `POST {url}/storage/v1/object/{bucket}/{key}` with the
//! service-role key. Objects in a public bucket are served from
//! `{url}/storage/v1/object/public/{bucket}/{key}`.

use async_trait::async_trait;

use crate::{ObjectStore, StorageError, StoredObject};

/// Object store backed by a Supabase Storage bucket.
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStore {
    /// * `base_url`    - project URL, e.g. `https://abc.supabase.co`.
    /// * `service_key` - service-role key; bypasses row-level security.
    /// * `bucket`      - public bucket name.
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }

    /// Map a non-2xx response to [`StorageError::Api`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ObjectStore for SupabaseStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let size_bytes = bytes.len() as u64;

        let response = self
            .client
            .post(self.object_url(key))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        Self::ensure_success(response).await?;

        tracing::debug!(bucket = %self.bucket, key, size_bytes, "Uploaded object");

        Ok(StoredObject {
            key: key.to_string(),
            public_url: self.public_url(key),
            content_type: content_type.to_string(),
            size_bytes,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(format!("{}/storage/v1/object/{}", self.base_url, self.bucket))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&serde_json::json!({ "prefixes": [key] }))
            .send()
            .await?;
        Self::ensure_success(response).await?;

        tracing::debug!(bucket = %self.bucket, key, "Deleted object");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use axum::body::Bytes;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;

    use super::*;

    type Seen = Arc<Mutex<Vec<(String, String, usize)>>>;

    async fn upload(
        State(seen): State<Seen>,
        Path((bucket, key)): Path<(String, String)>,
        headers: HeaderMap,
        body: Bytes,
    ) -> StatusCode {
        if headers.get("apikey").is_none() {
            return StatusCode::UNAUTHORIZED;
        }
        let ct = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        seen.lock().unwrap().push((format!("{bucket}/{key}"), ct, body.len()));
        StatusCode::OK
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    #[test]
    fn public_url_layout() {
        let store = SupabaseStore::new(reqwest::Client::new(), "https://abc.supabase.co/", "k", "media");
        assert_eq!(
            store.public_url("generated-videos/fal-x/1.mp4"),
            "https://abc.supabase.co/storage/v1/object/public/media/generated-videos/fal-x/1.mp4"
        );
    }

    #[tokio::test]
    async fn put_posts_bytes_with_content_type() {
        let seen: Seen = Arc::default();
        let router = Router::new()
            .route("/storage/v1/object/{bucket}/{*key}", post(upload))
            .with_state(Arc::clone(&seen));
        let base = spawn(router).await;

        let store = SupabaseStore::new(reqwest::Client::new(), &base, "service", "media");
        let stored = store
            .put("generated-audio/a/b.mp3", vec![1, 2, 3], "audio/mpeg")
            .await
            .unwrap();

        assert_eq!(stored.size_bytes, 3);
        assert!(stored.public_url.ends_with("/object/public/media/generated-audio/a/b.mp3"));
        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[("media/generated-audio/a/b.mp3".to_string(), "audio/mpeg".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn put_maps_error_status() {
        let router = Router::new().route(
            "/storage/v1/object/{bucket}/{*key}",
            post(|| async { (StatusCode::PAYLOAD_TOO_LARGE, "too big") }),
        );
        let base = spawn(router).await;

        let store = SupabaseStore::new(reqwest::Client::new(), &base, "service", "media");
        let err = store.put("k.mp4", vec![0; 8], "video/mp4").await.unwrap_err();

        assert_matches!(err, StorageError::Api { status: 413, ref body } if body == "too big");
    }
}
