use crate::ports::{AssetStore, DefinitionStore};

/// Application context holding dependencies for command execution.
pub struct AppContext<S: DefinitionStore, A: AssetStore> {
    store: S,
    assets: A,
}

impl<S: DefinitionStore, A: AssetStore> AppContext<S, A> {
    /// Create a new application context.
    pub fn new(store: S, assets: A) -> Self {
        Self { store, assets }
    }

    /// Get a reference to the definition store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the embedded asset store.
    pub fn assets(&self) -> &A {
        &self.assets
    }
}
