use std::collections::HashMap;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Failure while parsing or rendering a [`FormatTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A lone '{' with no closing brace.
    #[error("unclosed '{{' at byte {0} (use '{{{{' for a literal brace)")]
    UnclosedBrace(usize),

    /// A lone '}' with no opening brace.
    #[error("stray '}}' at byte {0} (use '}}}}' for a literal brace)")]
    StrayBrace(usize),

    /// An empty `{}` placeholder; positional fields are not supported.
    #[error("empty placeholder at byte {0}: placeholders must be named")]
    EmptyPlaceholder(usize),

    /// Placeholder name is not a plain identifier.
    #[error("invalid placeholder name '{name}' at byte {at}")]
    InvalidName { name: String, at: usize },

    /// A placeholder had no supplied value at render time.
    #[error("no value supplied for placeholder '{name}'")]
    Unresolved { name: String },
}

impl TemplateError {
    /// The placeholder name for [`TemplateError::Unresolved`], if that is
    /// what this error is.
    pub fn unresolved_name(&self) -> Option<&str> {
        match self {
            TemplateError::Unresolved { name } => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed `{placeholder}` template.
///
/// This is the wire format role definitions carry in `output_format`:
/// `{name}` marks a substitution point, `{{` and `}}` are literal braces,
/// and any other lone brace is a syntax error. Rendering is strict: every
/// placeholder must receive a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl FormatTemplate {
    /// Parse template text into literal and placeholder segments.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.char_indices().peekable();

        while let Some((at, c)) = chars.next() {
            match c {
                '{' => {
                    if let Some((_, '{')) = chars.peek() {
                        chars.next();
                        literal.push('{');
                        continue;
                    }
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedBrace(at));
                    }
                    if name.is_empty() {
                        return Err(TemplateError::EmptyPlaceholder(at));
                    }
                    if !is_placeholder_name(&name) {
                        return Err(TemplateError::InvalidName { name, at });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => {
                    if let Some((_, '}')) = chars.peek() {
                        chars.next();
                        literal.push('}');
                        continue;
                    }
                    return Err(TemplateError::StrayBrace(at));
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { raw: raw.to_string(), segments })
    }

    /// The exact source text this template was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in first-appearance order, deduplicated.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    /// Substitute every placeholder from `values`.
    ///
    /// Fails on the first placeholder (in template order) with no supplied
    /// value; extra keys in `values` are ignored. Literal text passes
    /// through untouched, with `{{`/`}}` already collapsed to single braces.
    pub fn render(&self, values: &Placeholders) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => match values.get(name) {
                    Some(value) => out.push_str(value),
                    None => return Err(TemplateError::Unresolved { name: name.clone() }),
                },
            }
        }
        Ok(out)
    }
}

impl Serialize for FormatTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Values supplied for placeholder substitution.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    values: HashMap<String, String>,
}

impl Placeholders {
    /// Create an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder-style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Insert a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a value by placeholder name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn plain_text_renders_unchanged() {
        let template = FormatTemplate::parse("no placeholders here").unwrap();
        assert_eq!(template.render(&Placeholders::new()).unwrap(), "no placeholders here");
        assert!(template.placeholders().is_empty());
    }

    #[test]
    fn single_placeholder_substitutes_exactly() {
        let template = FormatTemplate::parse("Tools: {tool_names}").unwrap();
        let values = Placeholders::new().with("tool_names", "Search, Calculator");
        assert_eq!(template.render(&values).unwrap(), "Tools: Search, Calculator");
    }

    #[test]
    fn repeated_placeholder_substitutes_everywhere() {
        let template = FormatTemplate::parse("{x} and {x}").unwrap();
        let values = Placeholders::new().with("x", "twice");
        assert_eq!(template.render(&values).unwrap(), "twice and twice");
        assert_eq!(template.placeholders(), vec!["x"]);
    }

    #[test]
    fn placeholders_keep_first_appearance_order() {
        let template = FormatTemplate::parse("{b}{a}{b}{c}").unwrap();
        assert_eq!(template.placeholders(), vec!["b", "a", "c"]);
    }

    #[test]
    fn escaped_braces_become_literals() {
        let template = FormatTemplate::parse("a {{literal}} brace").unwrap();
        assert_eq!(template.render(&Placeholders::new()).unwrap(), "a {literal} brace");
        assert!(template.placeholders().is_empty());
    }

    #[test]
    fn missing_value_is_unresolved_with_name() {
        let template = FormatTemplate::parse("Tools: {tool_names}").unwrap();
        let err = template.render(&Placeholders::new()).unwrap_err();
        assert_eq!(err.unresolved_name(), Some("tool_names"));
    }

    #[test]
    fn first_unresolved_placeholder_wins() {
        let template = FormatTemplate::parse("{first} then {second}").unwrap();
        let values = Placeholders::new().with("second", "ok");
        let err = template.render(&values).unwrap_err();
        assert_eq!(err.unresolved_name(), Some("first"));
    }

    #[test]
    fn extra_values_are_ignored() {
        let template = FormatTemplate::parse("just {one}").unwrap();
        let values = Placeholders::new().with("one", "1").with("unused", "x");
        assert_eq!(template.render(&values).unwrap(), "just 1");
    }

    #[test]
    fn unclosed_brace_is_rejected() {
        assert!(matches!(
            FormatTemplate::parse("broken {tool_names"),
            Err(TemplateError::UnclosedBrace(7))
        ));
    }

    #[test]
    fn stray_closing_brace_is_rejected() {
        assert!(matches!(FormatTemplate::parse("broken } here"), Err(TemplateError::StrayBrace(7))));
    }

    #[test]
    fn empty_placeholder_is_rejected() {
        assert!(matches!(FormatTemplate::parse("{}"), Err(TemplateError::EmptyPlaceholder(0))));
    }

    #[test]
    fn non_identifier_name_is_rejected() {
        assert!(matches!(
            FormatTemplate::parse("{tool names}"),
            Err(TemplateError::InvalidName { .. })
        ));
        assert!(matches!(FormatTemplate::parse("{0}"), Err(TemplateError::InvalidName { .. })));
    }

    #[test]
    fn raw_preserves_source_text() {
        let source = "Sub-Automaton: one of [{tool_names}]\n";
        let template = FormatTemplate::parse(source).unwrap();
        assert_eq!(template.raw(), source);
    }

    proptest! {
        #[test]
        fn brace_free_text_round_trips(text in "[^{}]{0,64}") {
            let template = FormatTemplate::parse(&text).unwrap();
            prop_assert_eq!(template.render(&Placeholders::new()).unwrap(), text);
        }

        #[test]
        fn doubled_braces_render_back_to_source(text in "[^{}]{0,32}\\{[^{}]{0,32}\\}[^{}]{0,32}") {
            let escaped = text.replace('{', "{{").replace('}', "}}");
            let template = FormatTemplate::parse(&escaped).unwrap();
            prop_assert_eq!(template.render(&Placeholders::new()).unwrap(), text);
        }

        #[test]
        fn substitution_is_exact(prefix in "[^{}]{0,32}", value in "[^{}]{0,32}", suffix in "[^{}]{0,32}") {
            let template = FormatTemplate::parse(&format!("{}{{slot}}{}", prefix, suffix)).unwrap();
            let rendered = template.render(&Placeholders::new().with("slot", value.as_str())).unwrap();
            prop_assert_eq!(rendered, format!("{}{}{}", prefix, value, suffix));
        }
    }
}
