use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, PoisonError, RwLock,
};

use anyhow::{anyhow, Result};

/// Outcome of the most recent load attempt that did not store a value.
#[derive(Debug, Default)]
struct Attempts {
    finished: u64,
    /// `None` when the last attempt loaded fine but was rejected by `keep`.
    error: Option<Arc<anyhow::Error>>,
}

/// A value loaded at most once and kept until invalidated.
/// Callers arriving while a load is running wait for it and share its outcome,
/// including a failure, instead of loading again.
#[derive(Debug)]
pub(crate) struct LoadOnce<T> {
    value: RwLock<Option<Arc<T>>>,
    gate: Mutex<Attempts>,
    /// Mirror of `Attempts::finished`, readable without waiting on the gate.
    finished: AtomicU64,
}

impl<T> Default for LoadOnce<T> {
    fn default() -> Self {
        Self { value: RwLock::new(None), gate: Mutex::new(Attempts::default()), finished: AtomicU64::new(0) }
    }
}

impl<T> LoadOnce<T> {
    /// Current value, if a load has succeeded.
    pub(crate) fn get(&self) -> Option<Arc<T>> {
        self.value.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Return the stored value, or run `load` and store its result if `keep` accepts it.
    /// A failed or rejected load leaves the slot empty so a later call tries again;
    /// callers that were already waiting on it get the same failure.
    pub(crate) fn get_or_load(
        &self,
        load: impl FnOnce() -> Result<T>,
        keep: impl Fn(&T) -> bool,
    ) -> Result<Option<Arc<T>>> {
        if let Some(value) = self.get() {
            return Ok(Some(value));
        }
        let seen = self.finished.load(Ordering::Acquire);

        let mut attempts = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished loading while we waited on the gate.
        if let Some(value) = self.get() {
            return Ok(Some(value));
        }
        if attempts.finished > seen {
            return match &attempts.error {
                Some(err) => Err(anyhow!("{err:#}")),
                None => Ok(None),
            };
        }

        let outcome = load().map(|loaded| keep(&loaded).then(|| Arc::new(loaded)));
        attempts.finished += 1;
        self.finished.store(attempts.finished, Ordering::Release);
        match outcome {
            Ok(Some(loaded)) => {
                attempts.error = None;
                *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
                Ok(Some(loaded))
            }
            Ok(None) => {
                attempts.error = None;
                Ok(None)
            }
            Err(err) => {
                let err = Arc::new(err);
                attempts.error = Some(err.clone());
                Err(anyhow!("{err:#}"))
            }
        }
    }

    /// Drop the stored value; the next `get_or_load` loads again.
    pub(crate) fn invalidate(&self) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
