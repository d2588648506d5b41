use crate::app::AppContext;
use crate::domain::AppError;
use crate::ports::{AssetStore, DefinitionStore};

/// Execute the init command.
///
/// Seeds a fresh workspace from the embedded scaffold: the `worker` role,
/// the quiz-creator demo automaton with its primitive delegates, the
/// assembly template, and a default `rolo.toml`.
pub fn execute<S, A>(ctx: &AppContext<S, A>) -> Result<(), AppError>
where
    S: DefinitionStore,
    A: AssetStore,
{
    if ctx.store().exists() {
        return Err(AppError::WorkspaceExists);
    }

    for file in ctx.assets().scaffold_files() {
        ctx.store().write_file(&file.path, &file.content)?;
    }

    Ok(())
}
