/*!
 * Asset extraction: materializes referenced binaries under the job's asset
 * directory.
 */

use log::debug;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::ExtractionError;
use crate::store::ContentStore;

/// Streams binaries from a content store into one job's asset directory
#[derive(Debug)]
pub struct AssetExtractor {
    store: Arc<dyn ContentStore>,
    dest_dir: PathBuf,
    // File ids already materialized in this job
    extracted: Mutex<HashSet<String>>,
}

impl AssetExtractor {
    /// Create an extractor writing into the given asset directory
    pub fn new<P: Into<PathBuf>>(store: Arc<dyn ContentStore>, dest_dir: P) -> Self {
        AssetExtractor {
            store,
            dest_dir: dest_dir.into(),
            extracted: Mutex::new(HashSet::new()),
        }
    }

    /// Destination path for a file id with the given extension
    pub fn asset_path(&self, file_id: &str, extension: &str) -> PathBuf {
        self.dest_dir.join(format!("{}.{}", file_id, extension))
    }

    /// Stream the binary addressed by `file_id` to the asset directory.
    ///
    /// Re-extracting a file already materialized in this job is a no-op
    /// returning the same path.
    pub async fn extract(
        &self,
        file_id: &str,
        extension: &str,
    ) -> Result<PathBuf, ExtractionError> {
        let path = self.asset_path(file_id, extension);
        if self.extracted.lock().contains(file_id) {
            return Ok(path);
        }

        let mut reader =
            self.store
                .read(file_id)
                .await
                .map_err(|source| ExtractionError::Resolve {
                    file_id: file_id.to_string(),
                    source,
                })?;

        let mut file =
            tokio::fs::File::create(&path)
                .await
                .map_err(|source| ExtractionError::Write {
                    file_id: file_id.to_string(),
                    source,
                })?;

        tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|source| ExtractionError::Write {
                file_id: file_id.to_string(),
                source,
            })?;

        self.extracted.lock().insert(file_id.to_string());
        debug!("extracted asset {} to {:?}", file_id, path);
        Ok(path)
    }
}
