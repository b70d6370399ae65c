//! Scriptable component library for loader tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Semaphore;

use super::{ComponentLibrary, LoadError};

pub struct MockLibrary {
    exports: HashSet<&'static str>,
    calls: AtomicUsize,
    pub completed: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl MockLibrary {
    pub fn new(exports: &[&'static str]) -> Self {
        Self {
            exports: exports.iter().copied().collect(),
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Every export waits for one permit on the returned semaphore.
    pub fn gated(exports: &[&'static str]) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (Self { gate: Some(gate.clone()), ..Self::new(exports) }, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ComponentLibrary for MockLibrary {
    type Component = Arc<String>;

    fn name(&self) -> &str {
        "mock-icons"
    }

    async fn export(&self, name: &str) -> Result<Option<Self::Component>, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        assert!(name != "Boom", "library exploded");
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(self.exports.contains(name).then(|| Arc::new(format!("<{name}/>"))))
    }
}

pub async fn wait_until(mut done: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !done() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached");
}
