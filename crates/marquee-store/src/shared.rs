//! Lazily-initialized shared store handle.
//!
//! The first request to touch the store triggers initialization; every
//! later request reuses the same handle for the process lifetime. The
//! single-flight guarantee comes from [`tokio::sync::OnceCell`]: concurrent
//! first requests await one initialization instead of racing.

use crate::{Store, StoreError};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::OnceCell;

type InitFuture = Pin<Box<dyn Future<Output = Result<Arc<dyn Store>, StoreError>> + Send>>;
type InitFn = Box<dyn Fn() -> InitFuture + Send + Sync>;

/// Cloneable handle to the process-wide store.
///
/// # Example
///
/// ```rust,no_run
/// use marquee_store::{SharedStore, SqliteStore};
///
/// # async fn demo() -> Result<(), marquee_store::StoreError> {
/// let store = SharedStore::new(|| SqliteStore::open("/tmp/marquee.db"));
/// let handle = store.get().await?; // opens the database
/// let again = store.get().await?;  // reuses the same handle
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<SharedInner>,
}

struct SharedInner {
    cell: OnceCell<Arc<dyn Store>>,
    init: InitFn,
}

impl SharedStore {
    /// Creates a handle whose store is initialized on first access.
    pub fn new<F, Fut, S>(init: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S, StoreError>> + Send + 'static,
        S: Store,
    {
        let init: InitFn = Box::new(move || {
            let fut = init();
            Box::pin(async move { Ok(Arc::new(fut.await?) as Arc<dyn Store>) })
        });

        Self {
            inner: Arc::new(SharedInner {
                cell: OnceCell::new(),
                init,
            }),
        }
    }

    /// Creates a handle around an already-initialized store, for tests.
    pub fn with_store(store: impl Store) -> Self {
        let store: Arc<dyn Store> = Arc::new(store);
        let for_init = store.clone();

        Self {
            inner: Arc::new(SharedInner {
                cell: OnceCell::new_with(Some(store)),
                init: Box::new(move || {
                    let store = for_init.clone();
                    Box::pin(async move { Ok(store) })
                }),
            }),
        }
    }

    /// Returns the store, initializing it on first call.
    ///
    /// A failed initialization is not cached; the next call retries.
    pub async fn get(&self) -> Result<Arc<dyn Store>, StoreError> {
        self.inner
            .cell
            .get_or_try_init(|| (self.inner.init)())
            .await
            .cloned()
    }
}

impl std::fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("initialized", &self.inner.cell.initialized())
            .finish()
    }
}
