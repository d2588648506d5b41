use std::io;

use thiserror::Error;

/// Library-wide error type for rolo operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Invalid user input outside the definition files.
    #[error("{0}")]
    Validation(String),

    /// Source text does not parse as the expected structure.
    #[error("Malformed definition {what}: {details}")]
    MalformedConfig { what: String, details: String },

    /// A required field is absent or empty.
    #[error("Missing required field '{field}' in {what}")]
    MissingField { what: String, field: &'static str },

    /// A template placeholder had no supplied value at render time.
    #[error("Unresolved placeholder '{placeholder}' in {template}")]
    UnresolvedPlaceholder { template: String, placeholder: String },

    /// Role identifier is invalid.
    #[error("Invalid role identifier '{0}': must be alphanumeric with hyphens or underscores")]
    InvalidRoleId(String),

    /// Automaton identifier is invalid.
    #[error("Invalid automaton identifier '{0}': must be alphanumeric with hyphens or underscores")]
    InvalidAutomatonId(String),

    /// Role definition not found in the workspace.
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// Automaton definition not found in the workspace.
    #[error("Automaton not found: {0}")]
    AutomatonNotFound(String),

    /// An id that names neither a role nor an automaton.
    #[error("No role or automaton named '{0}' in this workspace")]
    DefinitionNotFound(String),

    /// Sub-automaton references loop back on themselves.
    #[error("Circular delegation detected: {0}")]
    CircularDelegation(String),

    /// Workspace already present at the target location.
    #[error("rolo workspace already exists")]
    WorkspaceExists,

    /// No workspace found at the target location.
    #[error("No rolo workspace found here. Run 'rolo init' first.")]
    WorkspaceNotFound,

    /// A definition with this id already exists.
    #[error("{kind} '{id}' already exists")]
    DefinitionExists { kind: &'static str, id: String },

    /// Assembly template rendering failed.
    #[error("Prompt assembly failed for {template}: {details}")]
    PromptAssembly { template: String, details: String },

    /// Failure that should not occur in normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build a `MalformedConfig` for the named source.
    pub fn malformed(what: impl Into<String>, details: impl Into<String>) -> Self {
        AppError::MalformedConfig { what: what.into(), details: details.into() }
    }

    /// Build a `MissingField` for the named source.
    pub fn missing_field(what: impl Into<String>, field: &'static str) -> Self {
        AppError::MissingField { what: what.into(), field }
    }
}
