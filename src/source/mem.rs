use std::{collections::HashMap, sync::{Arc, PoisonError, RwLock}};

use anyhow::{anyhow, Result};

use super::DocumentSource;

/// Simple in-memory document store keyed by URL.
/// Used where the host does its own fetching and hands over the bytes.
#[derive(Default, Debug)]
pub struct MemSource {
    docs: RwLock<HashMap<String, Arc<[u8]>>>,
}

impl MemSource {
    pub fn new() -> Self { Self::default() }

    pub fn with_document(self, url: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(url, bytes);
        self
    }

    pub fn insert(&self, url: &str, bytes: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = bytes.into();
        let mut docs = self.docs.write().unwrap_or_else(PoisonError::into_inner);
        docs.insert(url.to_string(), Arc::from(bytes));
    }

    pub fn has(&self, url: &str) -> bool {
        self.docs.read().unwrap_or_else(PoisonError::into_inner).contains_key(url)
    }
}

impl DocumentSource for MemSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let docs = self.docs.read().unwrap_or_else(PoisonError::into_inner);
        docs.get(url)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| anyhow!("missing document: {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_inserted_documents_only() {
        let source = MemSource::new().with_document("mem://a", b"{}".to_vec());
        assert!(source.has("mem://a"));
        assert_eq!(source.fetch("mem://a").unwrap(), b"{}");
        assert!(source.fetch("mem://b").is_err());
    }

    #[test]
    fn poisoned_store_still_accepts_documents() {
        let source = MemSource::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _docs = source.docs.write().unwrap();
            panic!("writer died");
        }));
        assert!(source.docs.is_poisoned());

        source.insert("mem://late", b"[]".to_vec());
        assert!(source.has("mem://late"));
        assert_eq!(source.fetch("mem://late").unwrap(), b"[]");
    }
}
