use serde::Serialize;

use crate::domain::{AppError, AutomatonDefinition, AutomatonId, RoleDefinition, RoleId};
use crate::ports::DefinitionStore;

/// Structured fields of one definition, ready for serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShowOutput {
    Role {
        id: String,
        description: String,
        imperatives: Vec<String>,
        instructions: Vec<String>,
        output_format: String,
    },
    Automaton {
        id: String,
        name: String,
        role: String,
        rank: u32,
        engine: Option<String>,
        description: String,
        input_requirements: Vec<String>,
        sub_automata: Vec<String>,
        imperatives: Vec<String>,
        instructions: Vec<String>,
    },
}

impl ShowOutput {
    fn from_role(id: &RoleId, role: RoleDefinition) -> Self {
        ShowOutput::Role {
            id: id.to_string(),
            description: role.description,
            imperatives: role.imperatives,
            instructions: role.instructions,
            output_format: role.output_format.raw().to_string(),
        }
    }

    fn from_automaton(id: &AutomatonId, automaton: AutomatonDefinition) -> Self {
        ShowOutput::Automaton {
            id: id.to_string(),
            name: automaton.name,
            role: automaton.role.to_string(),
            rank: automaton.rank,
            engine: automaton.engine,
            description: automaton.description,
            input_requirements: automaton.input_requirements,
            sub_automata: automaton.sub_automata.iter().map(|sub| sub.to_string()).collect(),
            imperatives: automaton.imperatives,
            instructions: automaton.instructions,
        }
    }

    pub fn to_yaml(&self) -> Result<String, AppError> {
        serde_yaml::to_string(self)
            .map_err(|err| AppError::Internal(format!("Failed to serialize definition: {}", err)))
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Internal(format!("Failed to serialize definition: {}", err)))
    }
}

/// Load the definition `id` names, roles taking precedence over automata.
pub fn execute<S: DefinitionStore>(store: &S, id: &str) -> Result<ShowOutput, AppError> {
    // Both kinds share the identifier rules, so validate once up front.
    let automaton_id = AutomatonId::new(id)?;

    if let Ok(role_id) = RoleId::new(id)
        && store.has_role(&role_id)
    {
        let role = store.role(&role_id)?;
        return Ok(ShowOutput::from_role(&role_id, role));
    }

    if store.has_automaton(&automaton_id) {
        let automaton = store.automaton(&automaton_id)?;
        return Ok(ShowOutput::from_automaton(&automaton_id, automaton));
    }

    Err(AppError::DefinitionNotFound(id.to_string()))
}
