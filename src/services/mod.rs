mod definition_filesystem;
mod embedded_asset_store;

pub use definition_filesystem::FilesystemDefinitionStore;
pub use embedded_asset_store::EmbeddedAssetStore;
