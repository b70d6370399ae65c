//! Loader — on-demand component resolution with single-flight caching.
//!
//! DESIGN
//! ======
//! One mutex-guarded `LoaderState` holds the resolved cache, the in-flight
//! map and a generation counter. Clones of a `ComponentLoader` share it, so
//! one loader per library acts as the process-wide cache.
//!
//! A miss registers a `Shared` future in the in-flight map before the lock
//! is released, so every concurrent caller for the same name awaits the
//! same load. The load itself runs as a spawned task: a caller that stops
//! waiting does not cancel it, and the finished component still lands in
//! the cache. The task removes its in-flight entry and (on success) fills
//! the cache under one lock acquisition, before any waiter sees the result.
//!
//! Failures are never cached. The next `resolve` for that name starts a
//! fresh load.
//!
//! TRADE-OFFS
//! ==========
//! `clear_cache` bumps the generation instead of aborting running loads.
//! Loads from an older generation still answer their waiters but do not
//! write into the cleared state.

pub mod library;
pub mod preload;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared, join_all};
use serde::Serialize;

use crate::error::ErrorCode;

pub use library::{ComponentLibrary, IconProps, RenderIcon, SvgIcon, SvgIconLibrary};
pub use view::{IconState, IconView, MountOptions, Rendered};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while resolving a component. `Clone` so one failed load
/// can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The library has no export with this name.
    #[error("component \"{name}\" not found in {library}")]
    NotFound { name: String, library: String },

    /// The library could not be read.
    #[error("library load failed: {0}")]
    Library(String),

    /// The library panicked while resolving `name`.
    #[error("library panicked while loading \"{0}\"")]
    Panicked(String),

    /// The load task was cancelled by the runtime.
    #[error("load aborted: {0}")]
    Aborted(String),
}

impl ErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Library(_) => "E_LIBRARY",
            Self::Panicked(_) => "E_LIBRARY_PANIC",
            Self::Aborted(_) => "E_LOAD_ABORTED",
        }
    }

    fn retryable(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}

// =============================================================================
// STATE
// =============================================================================

type SharedLoad<C> = Shared<BoxFuture<'static, Result<C, LoadError>>>;

struct LoaderState<C> {
    cache: HashMap<String, C>,
    in_flight: HashMap<String, SharedLoad<C>>,
    generation: u64,
}

impl<C> Default for LoaderState<C> {
    fn default() -> Self {
        Self { cache: HashMap::new(), in_flight: HashMap::new(), generation: 0 }
    }
}

fn lock<C>(state: &Mutex<LoaderState<C>>) -> MutexGuard<'_, LoaderState<C>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Outcome of a bulk warm-up. Individual failures never abort the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    pub requested: usize,
    pub loaded: usize,
    pub failed: Vec<String>,
}

// =============================================================================
// LOADER
// =============================================================================

pub struct ComponentLoader<L: ComponentLibrary> {
    library: Arc<L>,
    state: Arc<Mutex<LoaderState<L::Component>>>,
}

impl<L: ComponentLibrary> Clone for ComponentLoader<L> {
    fn clone(&self) -> Self {
        Self { library: Arc::clone(&self.library), state: Arc::clone(&self.state) }
    }
}

impl<L: ComponentLibrary> ComponentLoader<L> {
    pub fn new(library: L) -> Self {
        Self { library: Arc::new(library), state: Arc::new(Mutex::new(LoaderState::default())) }
    }

    #[must_use]
    pub fn library(&self) -> &L {
        &self.library
    }

    /// Resolve `name`, sharing any load already in flight.
    ///
    /// Must be called inside a tokio runtime: a cache miss spawns the load.
    ///
    /// # Errors
    ///
    /// [`LoadError::NotFound`] when the library lacks the export, or the
    /// library's own failure. Errors are not cached.
    pub async fn resolve(&self, name: &str) -> Result<L::Component, LoadError> {
        let load = {
            let mut state = lock(&self.state);
            if let Some(component) = state.cache.get(name) {
                return Ok(component.clone());
            }
            if let Some(pending) = state.in_flight.get(name) {
                tracing::trace!(name, "joining in-flight load");
                pending.clone()
            } else {
                let load = self.start_load(name, state.generation);
                state.in_flight.insert(name.to_string(), load.clone());
                load
            }
        };
        load.await
    }

    /// Spawn the load task. Caller must hold the state lock and register
    /// the returned future before releasing it.
    fn start_load(&self, name: &str, generation: u64) -> SharedLoad<L::Component> {
        let library = Arc::clone(&self.library);
        let state = Arc::clone(&self.state);
        let name = name.to_string();
        tracing::debug!(name = %name, library = library.name(), "loading component");

        let task = tokio::spawn(async move {
            let result = match AssertUnwindSafe(library.export(&name)).catch_unwind().await {
                Ok(Ok(Some(component))) => Ok(component),
                Ok(Ok(None)) => Err(LoadError::NotFound { name: name.clone(), library: library.name().to_string() }),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(LoadError::Panicked(name.clone())),
            };

            {
                let mut state = lock(&state);
                if state.generation == generation {
                    state.in_flight.remove(&name);
                    if let Ok(component) = &result {
                        state.cache.insert(name.clone(), component.clone());
                    }
                }
            }

            match &result {
                Ok(_) => tracing::debug!(name = %name, "component cached"),
                Err(e) => tracing::warn!(name = %name, error = %e, "component load failed"),
            }
            result
        });

        async move { task.await.unwrap_or_else(|e| Err(LoadError::Aborted(e.to_string()))) }
            .boxed()
            .shared()
    }

    /// Warm the cache. Resolves once every name has been attempted.
    ///
    /// Must be called inside a tokio runtime, like [`ComponentLoader::resolve`].
    pub async fn preload<S: AsRef<str>>(&self, names: &[S]) -> PreloadReport {
        let attempts = names.iter().map(|name| {
            let name = name.as_ref();
            async move { (name, self.resolve(name).await) }
        });
        let results = join_all(attempts).await;

        let mut report = PreloadReport { requested: names.len(), ..PreloadReport::default() };
        for (name, result) in results {
            match result {
                Ok(_) => report.loaded += 1,
                Err(_) => report.failed.push(name.to_string()),
            }
        }
        tracing::info!(requested = report.requested, loaded = report.loaded, failed = report.failed.len(), "preloaded components");
        report
    }

    /// Cached component, if any. Never starts a load.
    #[must_use]
    pub fn cached(&self, name: &str) -> Option<L::Component> {
        lock(&self.state).cache.get(name).cloned()
    }

    #[must_use]
    pub fn is_cached(&self, name: &str) -> bool {
        lock(&self.state).cache.contains_key(name)
    }

    #[must_use]
    pub fn is_loading(&self, name: &str) -> bool {
        lock(&self.state).in_flight.contains_key(name)
    }

    #[must_use]
    pub fn cached_count(&self) -> usize {
        lock(&self.state).cache.len()
    }

    /// Drop every cached entry and in-flight marker. Intended for tests.
    pub fn clear_cache(&self) {
        let mut state = lock(&self.state);
        state.cache.clear();
        state.in_flight.clear();
        state.generation += 1;
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
