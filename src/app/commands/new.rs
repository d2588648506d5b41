use std::io::IsTerminal;

use dialoguer::Select;

use crate::app::AppContext;
use crate::domain::{AppError, AutomatonId, RoleId};
use crate::ports::{AssetStore, DefinitionStore};

/// Outcome of creating a definition from a starter template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewOutcome {
    Role { id: RoleId, path: String },
    Automaton { id: AutomatonId, path: String },
}

impl NewOutcome {
    /// Lowercase kind name for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            NewOutcome::Role { .. } => "role",
            NewOutcome::Automaton { .. } => "automaton",
        }
    }

    /// Workspace-relative path of the created file.
    pub fn display_path(&self) -> &str {
        match self {
            NewOutcome::Role { path, .. } | NewOutcome::Automaton { path, .. } => path,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DefinitionKind {
    Role,
    Automaton,
}

impl DefinitionKind {
    const ALL: [DefinitionKind; 2] = [DefinitionKind::Role, DefinitionKind::Automaton];

    fn label(self) -> &'static str {
        match self {
            DefinitionKind::Role => "role",
            DefinitionKind::Automaton => "automaton",
        }
    }

    fn from_arg(value: &str) -> Option<DefinitionKind> {
        Self::ALL.into_iter().find(|kind| kind.label() == value)
    }
}

/// Execute the new command.
///
/// Scaffolds a role or automaton definition from the embedded starter,
/// prompting interactively for anything not supplied as an argument.
pub fn execute<S, A>(
    ctx: &AppContext<S, A>,
    kind_arg: Option<&str>,
    name_arg: Option<&str>,
) -> Result<NewOutcome, AppError>
where
    S: DefinitionStore,
    A: AssetStore,
{
    if !ctx.store().exists() {
        return Err(AppError::WorkspaceNotFound);
    }

    let kind = resolve_kind(kind_arg)?;
    let name = resolve_name(name_arg, kind)?;

    match kind {
        DefinitionKind::Role => create_role(ctx, &name),
        DefinitionKind::Automaton => create_automaton(ctx, &name),
    }
}

/// Create a new role definition from the starter template.
pub fn create_role<S, A>(ctx: &AppContext<S, A>, name: &str) -> Result<NewOutcome, AppError>
where
    S: DefinitionStore,
    A: AssetStore,
{
    let id = RoleId::new(name)?;
    let content = ctx.assets().starter_role(&id);
    ctx.store().write_role(&id, &content)?;
    let path = ctx.store().role_label(&id);
    Ok(NewOutcome::Role { id, path })
}

/// Create a new automaton definition from the starter template.
pub fn create_automaton<S, A>(ctx: &AppContext<S, A>, name: &str) -> Result<NewOutcome, AppError>
where
    S: DefinitionStore,
    A: AssetStore,
{
    let id = AutomatonId::new(name)?;
    let content = ctx.assets().starter_automaton(&id);
    ctx.store().write_automaton(&id, &content)?;
    let path = ctx.store().automaton_label(&id);
    Ok(NewOutcome::Automaton { id, path })
}

fn resolve_kind(kind_arg: Option<&str>) -> Result<DefinitionKind, AppError> {
    match kind_arg {
        Some(value) => DefinitionKind::from_arg(value).ok_or_else(|| {
            AppError::Validation(format!(
                "Unknown definition kind '{value}' (expected role or automaton)"
            ))
        }),
        None => {
            if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
                select_kind()
            } else {
                Err(AppError::Validation(
                    "Definition kind is required when running non-interactively.".to_string(),
                ))
            }
        }
    }
}

fn resolve_name(name_arg: Option<&str>, kind: DefinitionKind) -> Result<String, AppError> {
    match name_arg {
        Some(value) => Ok(value.to_string()),
        None => {
            if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
                prompt_name(kind)
            } else {
                Err(AppError::Validation(
                    "Definition name is required when running non-interactively.".to_string(),
                ))
            }
        }
    }
}

/// Interactive kind selection.
fn select_kind() -> Result<DefinitionKind, AppError> {
    let items: Vec<&str> = DefinitionKind::ALL.iter().map(|kind| kind.label()).collect();

    let selection = Select::new()
        .with_prompt("Select what to create")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| AppError::Validation(format!("Kind selection failed: {e}")))?;

    Ok(DefinitionKind::ALL[selection])
}

/// Prompt for the definition name interactively.
fn prompt_name(kind: DefinitionKind) -> Result<String, AppError> {
    print!("Enter {} name: ", kind.label());
    use std::io::Write;
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| AppError::Validation(format!("Failed to read name: {e}")))?;

    let name = input.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }

    Ok(name)
}
