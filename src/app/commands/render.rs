use crate::domain::{AppError, Placeholders, RoleId};
use crate::ports::DefinitionStore;

/// Render one role's `output_format` with the given placeholder values.
///
/// `tools` is shorthand for the `tool_names` placeholder; `vars` holds
/// explicit `key=value` pairs and may override it.
pub fn execute<S: DefinitionStore>(
    store: &S,
    role: &str,
    tools: Option<&str>,
    vars: &[String],
) -> Result<String, AppError> {
    let id = RoleId::new(role)?;
    let definition = store.role(&id)?;

    let mut values = Placeholders::new();
    if let Some(tools) = tools {
        values.insert("tool_names", tools);
    }
    for pair in vars {
        let (key, value) = parse_var(pair)?;
        values.insert(key, value);
    }

    definition.render(&values)
}

fn parse_var(pair: &str) -> Result<(&str, &str), AppError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(AppError::Validation(format!("Invalid --var '{}': expected key=value", pair))),
    }
}
