use serde::{Deserialize, Serialize};

use super::AppError;
use super::template::{FormatTemplate, Placeholders, TemplateError};

/// A role definition: the behavioral profile an automaton assumes.
///
/// Loaded from `roles/<id>.yml`. Immutable once constructed; plain owned
/// data, freely shareable across threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleDefinition {
    /// Free-text description of what an automaton with this role is.
    pub description: String,
    /// Hard rules the automaton must always follow. May be empty.
    pub imperatives: Vec<String>,
    /// Working instructions, in presentation order. May be empty.
    pub instructions: Vec<String>,
    /// Template for the consumer-facing format instructions.
    pub output_format: FormatTemplate,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoleDefinitionDto {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    imperatives: Vec<String>,
    #[serde(default)]
    instructions: Vec<String>,
    #[serde(default)]
    output_format: Option<String>,
}

impl RoleDefinition {
    /// Parse a role definition from YAML text.
    ///
    /// `what` names the source in errors, typically the file path. Absent
    /// `imperatives`/`instructions` become empty sequences; an absent or
    /// empty `description`/`output_format` is a `MissingField`; anything
    /// else that does not fit the expected shape is `MalformedConfig`,
    /// including an `output_format` that fails template parsing.
    pub fn parse_yaml(source: &str, what: &str) -> Result<Self, AppError> {
        let dto: RoleDefinitionDto = serde_yaml::from_str(source)
            .map_err(|err| AppError::malformed(what, err.to_string()))?;

        let description = match dto.description {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(AppError::missing_field(what, "description")),
        };

        let output_format = match dto.output_format {
            Some(text) if !text.trim().is_empty() => FormatTemplate::parse(&text)
                .map_err(|err| AppError::malformed(what, format!("output_format: {}", err)))?,
            _ => return Err(AppError::missing_field(what, "output_format")),
        };

        Ok(Self {
            description,
            imperatives: dto.imperatives,
            instructions: dto.instructions,
            output_format,
        })
    }

    /// Render `output_format` with the supplied placeholder values.
    ///
    /// Pure; fails with `UnresolvedPlaceholder` naming the first
    /// placeholder that has no value. The structured fields are not
    /// touched; callers compose them as needed.
    pub fn render(&self, values: &Placeholders) -> Result<String, AppError> {
        self.output_format.render(values).map_err(|err| match err {
            TemplateError::Unresolved { name } => AppError::UnresolvedPlaceholder {
                template: "output_format".to_string(),
                placeholder: name,
            },
            other => AppError::malformed("output_format", other.to_string()),
        })
    }
}
