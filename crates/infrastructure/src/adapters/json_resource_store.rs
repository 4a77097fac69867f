//! JSON file resource registry - Implements ResourceRegistryPort
//!
//! Keeps the dashboard resource collection in a single JSON document:
//!
//! ```json
//! { "items": [ { "id": "…", "res_type": "module", "url": "/local/…" } ] }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::{NewResource, ResourceItem, ResourceRegistryPort};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ResourceDocument {
    #[serde(default)]
    items: Vec<ResourceItem>,
}

/// Resource collection persisted as a JSON file
#[derive(Debug)]
pub struct JsonResourceStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    lock: Mutex<()>,
}

impl JsonResourceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<ResourceDocument, ApplicationError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(ResourceDocument::default()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ApplicationError::Storage(format!("parsing {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ResourceDocument::default()),
            Err(e) => Err(ApplicationError::Storage(format!(
                "reading {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn save(&self, document: &ResourceDocument) -> Result<(), ApplicationError> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                ApplicationError::Storage(format!("creating {}: {e}", dir.display()))
            })?;
        }
        // Write a sibling file and rename so readers never see half a document.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| ApplicationError::Storage(format!("writing {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            ApplicationError::Storage(format!("replacing {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl ResourceRegistryPort for JsonResourceStore {
    async fn list(&self) -> Result<Vec<ResourceItem>, ApplicationError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.items)
    }

    #[instrument(skip(self))]
    async fn create(&self, resource: NewResource) -> Result<ResourceItem, ApplicationError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let item = ResourceItem {
            id: Uuid::new_v4().simple().to_string(),
            res_type: resource.res_type,
            url: resource.url,
        };
        document.items.push(item.clone());
        self.save(&document).await?;
        debug!(id = %item.id, "Resource created");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn update(
        &self,
        id: &str,
        resource: NewResource,
    ) -> Result<ResourceItem, ApplicationError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let item = document
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ApplicationError::NotFound(format!("resource {id}")))?;
        item.res_type = resource.res_type;
        item.url = resource.url;
        let updated = item.clone();
        self.save(&document).await?;
        debug!(id, "Resource updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use application::ports::ResourceType;

    use super::*;

    #[tokio::test]
    async fn missing_file_is_empty_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonResourceStore::new(dir.path().join("resources.json"));
        assert!(store.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn create_then_update_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("resources.json");
        let store = JsonResourceStore::new(&path);

        let created = store
            .create(NewResource::module("/local/card.js?v=1"))
            .await
            .expect("create");
        let updated = store
            .update(&created.id, NewResource::module("/local/card.js?v=2"))
            .await
            .expect("update");

        assert_eq!(updated.id, created.id);
        let items = JsonResourceStore::new(&path).list().await.expect("list");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "/local/card.js?v=2");
        assert_eq!(items[0].res_type, ResourceType::Module);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonResourceStore::new(dir.path().join("resources.json"));

        let err = store
            .update("nope", NewResource::module("/x.js"))
            .await
            .expect_err("unknown id");
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn reads_existing_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("resources.json");
        tokio::fs::write(
            &path,
            r#"{"items":[{"id":"a1","res_type":"css","url":"/local/theme.css"}]}"#,
        )
        .await
        .expect("seed");

        let items = JsonResourceStore::new(&path).list().await.expect("list");
        assert_eq!(items[0].res_type, ResourceType::Css);
    }

    #[tokio::test]
    async fn corrupt_document_is_storage_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("resources.json");
        tokio::fs::write(&path, "{not json").await.expect("seed");

        let err = JsonResourceStore::new(&path).list().await.expect_err("corrupt");
        assert!(matches!(err, ApplicationError::Storage(_)));
    }
}
