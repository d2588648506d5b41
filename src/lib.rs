//! rolo: Load role definitions and assemble automaton delegation prompts.

pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

use app::{
    AppContext,
    commands::{doctor, init, list, new, preview, render, show},
};
use ports::DefinitionStore;
use services::{EmbeddedAssetStore, FilesystemDefinitionStore};

pub use app::commands::doctor::{Diagnostic, DoctorOptions, DoctorOutcome, Severity};
pub use app::commands::list::{AutomatonListing, ListOutput, RoleListing};
pub use app::commands::new::NewOutcome;
pub use app::commands::show::ShowOutput;
pub use domain::{
    AppError, AssembledPrompt, AutomatonDefinition, AutomatonId, DefinitionCatalog, FormatTemplate,
    Placeholders, ResolvedAutomaton, RoleDefinition, RoleId, assemble, resolve,
};

fn current_context() -> Result<AppContext<FilesystemDefinitionStore, EmbeddedAssetStore>, AppError>
{
    let store = FilesystemDefinitionStore::current()?;
    Ok(AppContext::new(store, EmbeddedAssetStore::new()))
}

/// Initialize a new rolo workspace in the current directory.
pub fn init() -> Result<(), AppError> {
    let ctx = current_context()?;

    init::execute(&ctx)?;
    println!("✅ Initialized rolo workspace");
    Ok(())
}

/// Scaffold a role or automaton definition from the embedded starter.
///
/// Returns a `NewOutcome` describing the created file.
pub fn new(kind: Option<&str>, name: Option<&str>) -> Result<NewOutcome, AppError> {
    let ctx = current_context()?;

    let outcome = new::execute(&ctx, kind, name)?;
    println!("✅ Created new {} at {}", outcome.kind(), outcome.display_path());
    Ok(outcome)
}

/// List every role and automaton definition in the workspace.
pub fn list() -> Result<ListOutput, AppError> {
    let store = FilesystemDefinitionStore::current()?;

    if !store.exists() {
        return Err(AppError::WorkspaceNotFound);
    }

    list::execute(&store)
}

/// Load one definition and return its parsed fields.
pub fn show(id: &str) -> Result<ShowOutput, AppError> {
    let store = FilesystemDefinitionStore::current()?;

    if !store.exists() {
        return Err(AppError::WorkspaceNotFound);
    }

    show::execute(&store, id)
}

/// Render a role's output format template with placeholder values.
pub fn render_role(role: &str, tools: Option<&str>, vars: &[String]) -> Result<String, AppError> {
    let store = FilesystemDefinitionStore::current()?;

    if !store.exists() {
        return Err(AppError::WorkspaceNotFound);
    }

    render::execute(&store, role, tools, vars)
}

/// Assemble the full delegation prompt for an automaton.
pub fn preview(automaton: &str) -> Result<AssembledPrompt, AppError> {
    let ctx = current_context()?;

    if !ctx.store().exists() {
        return Err(AppError::WorkspaceNotFound);
    }

    preview::execute(&ctx, automaton)
}

/// Validate every definition in the workspace.
pub fn doctor(options: DoctorOptions) -> Result<DoctorOutcome, AppError> {
    let store = FilesystemDefinitionStore::current()?;

    if !store.exists() {
        return Err(AppError::WorkspaceNotFound);
    }

    doctor::execute(store.paths(), options)
}
