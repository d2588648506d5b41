use crate::domain::{
    AppError, AutomatonDefinition, AutomatonId, DefinitionCatalog, RoleDefinition, RoleId,
};

/// Port for reading and writing the definitions in a workspace.
pub trait DefinitionStore {
    /// Whether a workspace is present at this store's root.
    fn exists(&self) -> bool;

    /// Ids of all role definition files, sorted.
    fn list_roles(&self) -> Result<Vec<RoleId>, AppError>;

    /// Ids of all automaton definition files, sorted.
    fn list_automata(&self) -> Result<Vec<AutomatonId>, AppError>;

    fn has_role(&self, id: &RoleId) -> bool;

    fn has_automaton(&self, id: &AutomatonId) -> bool;

    /// Load and validate one role definition.
    fn role(&self, id: &RoleId) -> Result<RoleDefinition, AppError>;

    /// Load and validate one automaton definition.
    fn automaton(&self, id: &AutomatonId) -> Result<AutomatonDefinition, AppError>;

    /// Workspace-relative label of a role file, e.g. `roles/worker.yml`.
    /// Used in error messages and command output.
    fn role_label(&self, id: &RoleId) -> String;

    /// Workspace-relative label of an automaton file.
    fn automaton_label(&self, id: &AutomatonId) -> String;

    /// The workspace assembly template, if one is present.
    fn assembly_template(&self) -> Result<Option<String>, AppError>;

    /// Write a file relative to the workspace root, creating parent
    /// directories as needed.
    fn write_file(&self, relative_path: &str, content: &str) -> Result<(), AppError>;

    /// Write a new role definition; fails if the id is taken.
    fn write_role(&self, id: &RoleId, content: &str) -> Result<(), AppError>;

    /// Write a new automaton definition; fails if the id is taken.
    fn write_automaton(&self, id: &AutomatonId, content: &str) -> Result<(), AppError>;
}

/// Any definition store can feed a delegation resolution.
impl<S: DefinitionStore> DefinitionCatalog for S {
    fn role(&self, id: &RoleId) -> Result<RoleDefinition, AppError> {
        DefinitionStore::role(self, id)
    }

    fn automaton(&self, id: &AutomatonId) -> Result<AutomatonDefinition, AppError> {
        DefinitionStore::automaton(self, id)
    }
}
