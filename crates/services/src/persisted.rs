use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use storage::repository::{KeyValueStore, StoreKey};
use storage::snapshot;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum WriteCommand {
    Store(String),
    Flush(oneshot::Sender<()>),
}

/// In-memory state mirrored to a key-value store after every update.
///
/// Updates apply synchronously and queue a full-state write to a background
/// task; writes reach the store in update order. Reads always see the latest
/// in-memory value whether or not its write has landed.
///
/// Must be created inside a tokio runtime.
pub struct PersistedState<T> {
    key: StoreKey,
    state: Mutex<T>,
    writes: mpsc::UnboundedSender<WriteCommand>,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send + 'static,
{
    /// Rehydrate from `store`, falling back to `T::default()` when nothing is
    /// stored, the document is corrupt, or the store cannot be read.
    pub async fn load(store: Arc<dyn KeyValueStore>, key: StoreKey) -> Self {
        let state = match snapshot::load::<T>(store.as_ref(), key).await {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!(%key, "no stored state, starting from defaults");
                T::default()
            }
            Err(err) => {
                warn!(%key, error = %err, "stored state unusable, starting from defaults");
                T::default()
            }
        };

        let (writes, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(store, key, rx));

        Self {
            key,
            state: Mutex::new(state),
            writes,
        }
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> T {
        self.lock().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    /// Apply `f` and queue a write of the resulting state.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        let out = f(&mut guard);
        // Queue while still holding the lock so writes keep update order.
        self.queue_write(&guard);
        out
    }

    /// Apply `f`, queueing a write only when it reports a change.
    ///
    /// Returns what `f` returned.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let mut guard = self.lock();
        let changed = f(&mut guard);
        if changed {
            self.queue_write(&guard);
        }
        changed
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.writes.send(WriteCommand::Flush(done)).is_err() {
            return;
        }
        let _ = wait.await;
    }

    fn queue_write(&self, state: &T) {
        match snapshot::encode(state) {
            Ok(raw) => {
                if self.writes.send(WriteCommand::Store(raw)).is_err() {
                    warn!(key = %self.key, "state writer stopped, update not persisted");
                }
            }
            Err(err) => warn!(key = %self.key, error = %err, "failed to encode state"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn write_loop(
    store: Arc<dyn KeyValueStore>,
    key: StoreKey,
    mut rx: mpsc::UnboundedReceiver<WriteCommand>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Store(raw) => match store.set(key, &raw).await {
                Ok(()) => debug!(%key, bytes = raw.len(), "state persisted"),
                Err(err) => warn!(%key, error = %err, "failed to persist state"),
            },
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
