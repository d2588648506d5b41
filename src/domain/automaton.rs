use serde::{Deserialize, Serialize};

use super::AppError;
use super::id::{AutomatonId, RoleId};

/// Engines the delegation runtime knows how to drive.
///
/// Unknown engines load fine; `doctor` flags them so a typo is caught
/// before the runtime rejects it.
pub const KNOWN_ENGINES: [&str; 2] = ["gpt-3.5-turbo", "gpt-4"];

/// Primitive delegates the runtime implements for the reserved `function`
/// role.
pub const SUPPORTED_FUNCTIONS: [&str; 4] = ["llm_assistant", "save_file", "reflect", "human"];

/// An automaton definition loaded from `automata/<id>.yml`.
///
/// Describes one delegating agent (or primitive `function` delegate): who
/// it is, which role prompt it assumes, and which sub-automata it may call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutomatonDefinition {
    /// Display name shown to delegators, e.g. "Quiz Creator".
    pub name: String,
    /// Role id; `function` marks a primitive delegate with no role file.
    pub role: RoleId,
    /// Position in the delegation hierarchy; part of the display name.
    pub rank: u32,
    /// Reasoning engine, or `None` for automata that never reason.
    pub engine: Option<String>,
    /// What this automaton does, shown to delegators.
    pub description: String,
    /// What a delegator must supply when calling this automaton.
    pub input_requirements: Vec<String>,
    /// Ids of the automata this one may delegate to, in listing order.
    pub sub_automata: Vec<AutomatonId>,
    /// Extra imperatives appended after the role's own.
    pub imperatives: Vec<String>,
    /// Extra instructions appended after the role's own.
    pub instructions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AutomatonDefinitionDto {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<RoleId>,
    #[serde(default)]
    rank: Option<u32>,
    // Present-but-null and absent are different: the format always carries
    // the key, so absence is a MissingField.
    #[serde(default, deserialize_with = "present_engine")]
    engine: Option<Option<String>>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    input_requirements: Vec<String>,
    #[serde(default)]
    sub_automata: Vec<AutomatonId>,
    #[serde(default)]
    imperatives: Vec<String>,
    #[serde(default)]
    instructions: Vec<String>,
}

/// Wraps a present `engine` value (null included) in `Some`, so only a
/// truly absent key falls back to the `None` default.
fn present_engine<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl AutomatonDefinition {
    /// Parse an automaton definition from YAML text.
    ///
    /// `what` names the source in errors, typically the file path.
    pub fn parse_yaml(source: &str, what: &str) -> Result<Self, AppError> {
        let dto: AutomatonDefinitionDto = serde_yaml::from_str(source)
            .map_err(|err| AppError::malformed(what, err.to_string()))?;

        let name = match dto.name {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(AppError::missing_field(what, "name")),
        };
        let role = dto.role.ok_or_else(|| AppError::missing_field(what, "role"))?;
        let rank = dto.rank.ok_or_else(|| AppError::missing_field(what, "rank"))?;
        let engine = dto.engine.ok_or_else(|| AppError::missing_field(what, "engine"))?;
        let description = match dto.description {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(AppError::missing_field(what, "description")),
        };

        Ok(Self {
            name,
            role,
            rank,
            engine,
            description,
            input_requirements: dto.input_requirements,
            sub_automata: dto.sub_automata,
            imperatives: dto.imperatives,
            instructions: dto.instructions,
        })
    }

    /// Whether this automaton is a primitive delegate (reserved role).
    pub fn is_function(&self) -> bool {
        self.role.is_function()
    }

    /// Full name shown to delegators: `"{name} ({role} {rank})"`.
    pub fn display_name(&self) -> String {
        format!("{} ({} {})", self.name, self.role, self.rank)
    }

    /// Description plus bulleted input requirements, as delegators see it
    /// in the tool listing. An empty requirement list reads `None`.
    pub fn tool_description(&self) -> String {
        let requirements = if self.input_requirements.is_empty() {
            "None".to_string()
        } else {
            self.input_requirements
                .iter()
                .map(|req| format!("- {}", req))
                .collect::<Vec<_>>()
                .join("\n")
        };
        format!("{} Input requirements:\n{}", self.description, requirements)
    }
}
