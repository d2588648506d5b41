pub mod assembly;
pub mod automaton;
pub mod error;
pub mod id;
pub mod prompt;
pub mod role;
pub mod template;
pub mod workspace;

pub use assembly::{AssembledPrompt, DefinitionCatalog, ResolvedAutomaton, resolve};
pub use automaton::{AutomatonDefinition, KNOWN_ENGINES, SUPPORTED_FUNCTIONS};
pub use error::AppError;
pub use id::{AutomatonId, RoleId};
pub use prompt::assemble;
pub use role::RoleDefinition;
pub use template::{FormatTemplate, Placeholders, TemplateError};
pub use workspace::{WorkspaceConfig, WorkspacePaths};
