//! Fetch hooks: observable `{data, loading, error}` state around async loads.
//!
//! Every load takes a generation number when it starts. A result is applied
//! only if no newer load has started since, so the most recent request wins
//! no matter in which order responses arrive.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::DashboardError;

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, DashboardError>> + Send>>;
type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// Snapshot of a [`Resource`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: T,
    pub loading: bool,
    /// Message of the last failed load, cleared when a new load starts.
    pub error: Option<String>,
}

/// Data that is loaded asynchronously and can be refetched.
pub struct Resource<T> {
    state: Mutex<ResourceState<T>>,
    generation: AtomicU64,
    fetcher: Mutex<Option<Fetcher<T>>>,
}

impl<T> Default for Resource<T>
where
    T: Clone + Default + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Resource<T>
where
    T: Clone + Default + Send + 'static,
{
    /// An idle resource holding `T::default()` and no fetcher.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ResourceState {
                data: T::default(),
                loading: false,
                error: None,
            }),
            generation: AtomicU64::new(0),
            fetcher: Mutex::new(None),
        }
    }

    pub fn with_fetcher<F, Fut>(fetcher: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, DashboardError>> + Send + 'static,
    {
        let resource = Self::new();
        resource.set_fetcher(fetcher);
        resource
    }

    /// Replaces the fetcher used by [`refetch`](Self::refetch), e.g. when
    /// query parameters change.
    pub fn set_fetcher<F, Fut>(&self, fetcher: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, DashboardError>> + Send + 'static,
    {
        let boxed: Fetcher<T> = Arc::new(move || Box::pin(fetcher()) as BoxFuture<T>);
        *self.fetcher.lock().unwrap_or_else(|e| e.into_inner()) = Some(boxed);
    }

    /// Runs the current fetcher. Returns whether the result was applied.
    pub async fn refetch(&self) -> bool {
        let fetcher = self
            .fetcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match fetcher {
            Some(fetch) => self.load(fetch()).await,
            None => {
                tracing::debug!("refetch called without a fetcher");
                false
            }
        }
    }

    /// Runs `fut` as a load of this resource without replacing the fetcher.
    /// Returns `false` when a newer load started before `fut` finished.
    pub async fn load<Fut>(&self, fut: Fut) -> bool
    where
        Fut: Future<Output = Result<T, DashboardError>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock_state();
            state.loading = true;
            state.error = None;
        }

        let result = fut.await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding stale response");
            return false;
        }
        let mut state = self.lock_state();
        match result {
            Ok(data) => state.data = data,
            Err(err) => {
                tracing::debug!("load failed: {}", err);
                state.error = Some(err.to_string());
            }
        }
        state.loading = false;
        true
    }

    pub fn snapshot(&self) -> ResourceState<T> {
        self.lock_state().clone()
    }

    pub fn data(&self) -> T {
        self.lock_state().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ResourceState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Loading and error tracking for one-off mutations (create, update, delete).
#[derive(Debug, Default)]
pub struct Action {
    state: Mutex<ActionState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionState {
    pub loading: bool,
    pub error: Option<String>,
}

impl Action {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `fut`, recording its failure message, and hands back its result.
    pub async fn run<U, Fut>(&self, fut: Fut) -> Result<U, DashboardError>
    where
        Fut: Future<Output = Result<U, DashboardError>>,
    {
        self.set(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = fut.await;
        self.set(|s| {
            s.loading = false;
            s.error = result.as_ref().err().map(|e| e.to_string());
        });
        result
    }

    pub fn snapshot(&self) -> ActionState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set(&self, f: impl FnOnce(&mut ActionState)) {
        f(&mut self.state.lock().unwrap_or_else(|e| e.into_inner()));
    }
}
