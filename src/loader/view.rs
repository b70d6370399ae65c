//! Icon view — the stateful wrapper a UI mounts for one named icon.
//!
//! A view starts as a sized placeholder unless the icon is already cached,
//! then switches to the icon (or the fallback) when the load settles.
//! Dropping the view is the unmount: a load that finishes afterwards
//! updates nothing and fires no callbacks, but still fills the shared cache.
//! The load task holds the `mounted` flag's lock while it delivers, so once
//! `drop` returns no callback can start.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use super::library::{IconProps, RenderIcon, render_placeholder};
use super::{ComponentLibrary, ComponentLoader, LoadError};

type LoadCallback = Box<dyn FnOnce() + Send>;
type ErrorCallback = Box<dyn FnOnce(&LoadError) + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconState<C> {
    Loading,
    Ready(C),
    /// Load failed and a fallback was supplied.
    Fallback(C),
    /// Load failed without a fallback; the placeholder stays.
    Failed(LoadError),
}

impl<C> IconState<C> {
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// What to draw right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<C> {
    Placeholder { size: u32, class: Option<String> },
    Icon(C),
}

pub struct MountOptions<C> {
    pub fallback: Option<C>,
    pub on_load: Option<LoadCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl<C> Default for MountOptions<C> {
    fn default() -> Self {
        Self { fallback: None, on_load: None, on_error: None }
    }
}

impl<C> MountOptions<C> {
    #[must_use]
    pub fn with_fallback(mut self, fallback: C) -> Self {
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn on_load(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_load = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_error(mut self, f: impl FnOnce(&LoadError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

pub struct IconView<C> {
    name: String,
    props: IconProps,
    state: watch::Receiver<IconState<C>>,
    mounted: Arc<Mutex<bool>>,
}

impl<C: Clone + Send + Sync + 'static> IconView<C> {
    /// Mount a view. Must be called inside a tokio runtime when the icon
    /// is not cached yet.
    pub fn mount<L>(loader: &ComponentLoader<L>, name: &str, props: IconProps, options: MountOptions<C>) -> Self
    where
        L: ComponentLibrary<Component = C>,
    {
        let MountOptions { fallback, on_load, on_error } = options;

        if let Some(component) = loader.cached(name) {
            if let Some(f) = on_load {
                f();
            }
            let (_tx, state) = watch::channel(IconState::Ready(component));
            return Self { name: name.to_string(), props, state, mounted: Arc::new(Mutex::new(true)) };
        }

        let (tx, state) = watch::channel(IconState::Loading);
        let mounted = Arc::new(Mutex::new(true));
        let still_mounted = Arc::clone(&mounted);
        let loader = loader.clone();
        let icon = name.to_string();
        tokio::spawn(async move {
            let result = loader.resolve(&icon).await;
            let live = still_mounted.lock().unwrap_or_else(PoisonError::into_inner);
            if !*live {
                tracing::debug!(name = %icon, "icon view unmounted before load settled");
                return;
            }
            match result {
                Ok(component) => {
                    tx.send_replace(IconState::Ready(component));
                    if let Some(f) = on_load {
                        f();
                    }
                }
                Err(e) => {
                    tracing::error!(name = %icon, error = %e, "failed to load icon");
                    if let Some(f) = on_error {
                        f(&e);
                    }
                    tx.send_replace(fallback.map_or(IconState::Failed(e), IconState::Fallback));
                }
            }
        });

        Self { name: name.to_string(), props, state, mounted }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn state(&self) -> IconState<C> {
        self.state.borrow().clone()
    }

    /// Wait until the load settles and return the final state.
    pub async fn settled(&mut self) -> IconState<C> {
        if let Ok(state) = self.state.wait_for(IconState::is_settled).await {
            return state.clone();
        }
        self.state()
    }

    #[must_use]
    pub fn rendered(&self) -> Rendered<C> {
        match &*self.state.borrow() {
            IconState::Ready(c) | IconState::Fallback(c) => Rendered::Icon(c.clone()),
            IconState::Loading | IconState::Failed(_) => {
                Rendered::Placeholder { size: self.props.effective_size(), class: self.props.class.clone() }
            }
        }
    }
}

impl<C: RenderIcon + Clone + Send + Sync + 'static> IconView<C> {
    /// Markup for the current state.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self.rendered() {
            Rendered::Icon(c) => c.render(&self.props),
            Rendered::Placeholder { .. } => render_placeholder(&self.props),
        }
    }
}

impl<C> Drop for IconView<C> {
    fn drop(&mut self) {
        *self.mounted.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
