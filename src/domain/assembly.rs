//! Resolution of an automaton's delegation graph into prompt ingredients.

use std::collections::BTreeSet;

use super::automaton::AutomatonDefinition;
use super::error::AppError;
use super::id::{AutomatonId, RoleId};
use super::role::RoleDefinition;
use super::template::Placeholders;

/// Read access to the definitions a resolution needs.
pub trait DefinitionCatalog {
    fn role(&self, id: &RoleId) -> Result<RoleDefinition, AppError>;
    fn automaton(&self, id: &AutomatonId) -> Result<AutomatonDefinition, AppError>;
}

/// An automaton joined with its role and its directly delegated sub-automata.
///
/// Construction goes through [`resolve`], which also walks the transitive
/// delegation graph so every reference is known to exist and be acyclic.
#[derive(Debug, Clone)]
pub struct ResolvedAutomaton {
    pub definition: AutomatonDefinition,
    pub role: RoleDefinition,
    pub sub_automata: Vec<AutomatonDefinition>,
}

/// A fully assembled delegation prompt.
#[derive(Debug, Clone)]
pub struct AssembledPrompt {
    /// Name of the automaton the prompt belongs to.
    pub automaton: String,
    /// Role the prompt was assembled from.
    pub role: RoleId,
    /// Display names of the delegated sub-automata, in declaration order.
    pub tool_names: Vec<String>,
    /// The prompt text handed to the runtime.
    pub content: String,
}

/// Resolve `id` and everything its prompt needs.
///
/// The target must have a real role; primitive delegates (`role: function`)
/// carry no role prompt and cannot be resolved. Every automaton reachable
/// through `sub_automata` must exist, and the delegation graph must be
/// acyclic.
pub fn resolve<C: DefinitionCatalog>(
    catalog: &C,
    id: &AutomatonId,
) -> Result<ResolvedAutomaton, AppError> {
    let definition = catalog.automaton(id)?;

    if definition.is_function() {
        return Err(AppError::RoleNotFound(format!(
            "{} (automaton '{}' is a primitive delegate and has no role prompt)",
            definition.role, definition.name,
        )));
    }
    let role = catalog.role(&definition.role)?;

    let mut visited = BTreeSet::new();
    let mut visiting = BTreeSet::new();
    walk_delegations(catalog, id, &definition, &mut visited, &mut visiting, &mut Vec::new())?;

    let mut sub_automata = Vec::with_capacity(definition.sub_automata.len());
    for sub_id in &definition.sub_automata {
        sub_automata.push(catalog.automaton(sub_id)?);
    }

    Ok(ResolvedAutomaton { definition, role, sub_automata })
}

/// Depth-first walk over the delegation graph.
///
/// `visiting` holds the current path for cycle detection; `visited` keeps the
/// walk from recursing past a definition it has already cleared.
fn walk_delegations<C: DefinitionCatalog>(
    catalog: &C,
    id: &AutomatonId,
    definition: &AutomatonDefinition,
    visited: &mut BTreeSet<AutomatonId>,
    visiting: &mut BTreeSet<AutomatonId>,
    path: &mut Vec<String>,
) -> Result<(), AppError> {
    if visited.contains(id) {
        return Ok(());
    }

    if visiting.contains(id) {
        path.push(id.to_string());
        return Err(AppError::CircularDelegation(path.join(" -> ")));
    }

    visiting.insert(id.clone());
    path.push(id.to_string());

    for sub_id in &definition.sub_automata {
        let sub = catalog.automaton(sub_id)?;
        walk_delegations(catalog, sub_id, &sub, visited, visiting, path)?;
    }

    path.pop();
    visiting.remove(id);
    visited.insert(id.clone());

    Ok(())
}

impl ResolvedAutomaton {
    /// Role imperatives first, then the automaton's own.
    pub fn merged_imperatives(&self) -> Vec<String> {
        let mut merged = self.role.imperatives.clone();
        merged.extend(self.definition.imperatives.iter().cloned());
        merged
    }

    /// Role instructions first, then the automaton's own.
    pub fn merged_instructions(&self) -> Vec<String> {
        let mut merged = self.role.instructions.clone();
        merged.extend(self.definition.instructions.iter().cloned());
        merged
    }

    /// Display names of the delegated sub-automata, in declaration order.
    pub fn tool_names(&self) -> Vec<String> {
        self.sub_automata.iter().map(AutomatonDefinition::display_name).collect()
    }

    /// One `name: description` line per delegated sub-automaton.
    pub fn tool_lines(&self) -> Vec<String> {
        self.sub_automata
            .iter()
            .map(|sub| format!("{}: {}", sub.display_name(), sub.tool_description()))
            .collect()
    }

    /// The role's output format with `{tool_names}` filled in.
    pub fn format_instructions(&self) -> Result<String, AppError> {
        let values = Placeholders::new().with("tool_names", self.tool_names().join(", "));
        self.role.render(&values)
    }
}
