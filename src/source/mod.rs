#[cfg(feature = "download")]
mod http;
mod mem;

#[cfg(feature = "download")]
pub use http::HttpSource;
pub use mem::MemSource;

use anyhow::Result;

/// Read-only access to remote documents by URL.
pub trait DocumentSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

impl<S: DocumentSource + ?Sized> DocumentSource for std::sync::Arc<S> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> { (**self).fetch(url) }
}
