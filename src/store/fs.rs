/*!
 * Filesystem-backed content store.
 *
 * Binaries live in a flat directory, one file per identifier with no
 * extension, the way the data layer's blob storage lays them out on disk.
 */

use async_trait::async_trait;
use log::debug;
use std::io;
use std::path::PathBuf;

use crate::errors::StoreError;
use crate::store::{ByteStream, ContentStore};

/// Content store reading binaries from a local directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at the given directory
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        FsStore { root: root.into() }
    }
}

#[async_trait]
impl ContentStore for FsStore {
    async fn read(&self, file_id: &str) -> Result<ByteStream, StoreError> {
        // Identifiers are opaque tokens, never paths
        if file_id.is_empty() || file_id.contains(['/', '\\']) || file_id.contains("..") {
            return Err(StoreError::NotFound(file_id.to_string()));
        }

        let path = self.root.join(file_id);
        debug!("opening content store file {:?}", path);
        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(file_id.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
