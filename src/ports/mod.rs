mod asset_store;
mod definition_store;

pub use asset_store::{AssetStore, ScaffoldFile};
pub use definition_store::DefinitionStore;
