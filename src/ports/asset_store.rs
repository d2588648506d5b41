use crate::domain::{AutomatonId, RoleId};

/// A file embedded in the scaffold bundle.
#[derive(Debug, Clone)]
pub struct ScaffoldFile {
    /// Path relative to the workspace root.
    pub path: String,
    /// File content as UTF-8 text.
    pub content: String,
}

/// Port for accessing embedded scaffold and starter content.
pub trait AssetStore {
    /// All scaffold files for workspace initialization, sorted by path.
    fn scaffold_files(&self) -> Vec<ScaffoldFile>;

    /// Starter content for a new role definition.
    fn starter_role(&self, id: &RoleId) -> String;

    /// Starter content for a new automaton definition.
    fn starter_automaton(&self, id: &AutomatonId) -> String;

    /// The embedded default assembly template.
    fn assembly_template(&self) -> &str;
}
