/*!
 * Content-store clients supplying attached binaries.
 *
 * A content store resolves a file identifier to a byte stream. The export
 * pipeline only ever reads; writing and access control stay with the data
 * layer that owns the store.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use tokio::io::AsyncRead;

use crate::errors::StoreError;

/// Byte stream handed back by a content store
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Common trait for all content-store clients
///
/// This trait defines the interface the asset extractor reads binaries
/// through, allowing store backends to be used interchangeably.
#[async_trait]
pub trait ContentStore: Send + Sync + Debug {
    /// Open the binary addressed by `file_id` for sequential reading
    ///
    /// # Arguments
    /// * `file_id` - Identifier of the binary in the store
    ///
    /// # Returns
    /// * `Result<ByteStream, StoreError>` - The byte stream or an error
    async fn read(&self, file_id: &str) -> Result<ByteStream, StoreError>;
}

pub mod fs;

pub use fs::FsStore;
