//! Rendering of the workspace assembly template.
//!
//! The template is Jinja (`templates/automaton_prompt.j2`); the resolved
//! automaton supplies its context. Runtime tokens such as `{input}` and
//! `{agent_scratchpad}` use single braces, which Jinja leaves untouched, so
//! they survive into the assembled prompt for the runtime to fill.

use minijinja::{Environment, UndefinedBehavior, context};

use super::assembly::{AssembledPrompt, ResolvedAutomaton};
use super::error::AppError;
use super::workspace::ASSEMBLY_TEMPLATE_FILE;

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_function("bullets", |items: Vec<String>| -> String {
        items.iter().map(|item| format!("- {item}")).collect::<Vec<_>>().join("\n")
    });
    env
}

/// Render `template` into the delegation prompt for `resolved`.
pub fn assemble(
    resolved: &ResolvedAutomaton,
    template: &str,
) -> Result<AssembledPrompt, AppError> {
    let format_instructions = resolved.format_instructions()?;
    let tool_names = resolved.tool_names();

    let env = environment();
    let content = env
        .render_str(
            template,
            context! {
                automaton_name => &resolved.definition.name,
                display_name => resolved.definition.display_name(),
                role_description => &resolved.role.description,
                imperatives => resolved.merged_imperatives(),
                instructions => resolved.merged_instructions(),
                input_requirements => &resolved.definition.input_requirements,
                tool_lines => resolved.tool_lines(),
                format_instructions => format_instructions,
            },
        )
        .map_err(|err| AppError::PromptAssembly {
            template: ASSEMBLY_TEMPLATE_FILE.to_string(),
            details: err.to_string(),
        })?;

    Ok(AssembledPrompt {
        automaton: resolved.definition.name.clone(),
        role: resolved.definition.role.clone(),
        tool_names,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::automaton::AutomatonDefinition;
    use crate::domain::role::RoleDefinition;

    fn resolved() -> ResolvedAutomaton {
        let role = RoleDefinition::parse_yaml(
            "description: Works through tasks.\n\
             imperatives:\n  - Stay on task.\n\
             instructions:\n  - Save results.\n\
             output_format: \"Pick one of [{tool_names}].\"\n",
            "worker",
        )
        .unwrap();
        let definition = AutomatonDefinition::parse_yaml(
            "name: quiz_creator\nrole: worker\nrank: 2\nengine: gpt-4\n\
             description: Creates quizzes.\n\
             sub_automata:\n  - save_file\n",
            "quiz_creator",
        )
        .unwrap();
        let sub = AutomatonDefinition::parse_yaml(
            "name: save_file\nrole: function\nrank: 0\nengine: null\n\
             description: Writes a file.\n\
             input_requirements:\n  - \"path: where to write\"\n",
            "save_file",
        )
        .unwrap();
        ResolvedAutomaton { definition, role, sub_automata: vec![sub] }
    }

    #[test]
    fn assemble_fills_context() {
        let template = "You are {{ display_name }}. {{ role_description }}\n\n\
                        {{ bullets(imperatives) }}\n\n\
                        Delegates:\n{{ bullets(tool_lines) }}\n\n\
                        {{ format_instructions }}\n\n\
                        Assigned Task: {input}\n{agent_scratchpad}";

        let prompt = assemble(&resolved(), template).unwrap();

        assert_eq!(prompt.automaton, "quiz_creator");
        assert_eq!(prompt.tool_names, vec!["save_file (function 0)"]);
        assert!(prompt.content.starts_with("You are quiz_creator (worker 2). Works through tasks."));
        assert!(prompt.content.contains("- Stay on task."));
        assert!(
            prompt
                .content
                .contains("- save_file (function 0): Writes a file. Input requirements:\n- path: where to write")
        );
        assert!(prompt.content.contains("Pick one of [save_file (function 0)]."));
    }

    #[test]
    fn runtime_tokens_survive() {
        let prompt = assemble(&resolved(), "{{ automaton_name }}: {input}\n{agent_scratchpad}")
            .unwrap();

        assert_eq!(prompt.content, "quiz_creator: {input}\n{agent_scratchpad}");
    }

    #[test]
    fn trailing_newline_is_kept() {
        let prompt = assemble(&resolved(), "{{ automaton_name }}\n").unwrap();

        assert_eq!(prompt.content, "quiz_creator\n");
    }

    #[test]
    fn undefined_variable_fails() {
        let err = assemble(&resolved(), "{{ not_a_thing }}").unwrap_err();

        match err {
            AppError::PromptAssembly { template, .. } => {
                assert_eq!(template, ASSEMBLY_TEMPLATE_FILE);
            }
            other => panic!("expected PromptAssembly, got {other:?}"),
        }
    }
}
