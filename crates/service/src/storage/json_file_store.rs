use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::{document::Document, errors::ServiceError, storage::DocumentStore};

/// JSON file-backed document store.
///
/// Every `load` re-reads the file; every `persist` rewrites it in full through
/// a temporary sibling that is renamed over the target.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Initialize the store from a path. The parent directory is created if missing;
    /// the file itself is only written on the first persist.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(Arc::new(Self { file_path }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn temp_path(&self) -> PathBuf {
        self.file_path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> Result<Document, ServiceError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "data file missing, starting empty");
                Ok(Document::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, document: &Document) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(document)?;
        // 先写同目录临时文件再 rename，读者只会看到完整的旧文件或新文件
        let temp_path = self.temp_path();
        fs::write(&temp_path, data).await?;
        if let Err(e) = fs::rename(&temp_path, &self.file_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}
