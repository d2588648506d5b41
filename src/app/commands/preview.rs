use crate::app::AppContext;
use crate::domain::{AppError, AssembledPrompt, AutomatonId, assemble, resolve};
use crate::ports::{AssetStore, DefinitionStore};

/// Assemble the full delegation prompt for one automaton.
///
/// The workspace's `templates/automaton_prompt.j2` drives the layout when
/// present; a workspace without one falls back to the embedded default.
pub fn execute<S, A>(ctx: &AppContext<S, A>, name: &str) -> Result<AssembledPrompt, AppError>
where
    S: DefinitionStore,
    A: AssetStore,
{
    let id = AutomatonId::new(name)?;
    let resolved = resolve(ctx.store(), &id)?;

    let template = match ctx.store().assembly_template()? {
        Some(text) => text,
        None => ctx.assets().assembly_template().to_string(),
    };

    assemble(&resolved, &template)
}
