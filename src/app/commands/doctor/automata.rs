use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde_yaml::Value;

use super::diagnostics::Diagnostics;
use super::yaml;
use crate::domain::id::validate_identifier;
use crate::domain::workspace::WorkspacePaths;
use crate::domain::{KNOWN_ENGINES, RoleId, SUPPORTED_FUNCTIONS};

const AUTOMATON_FIELDS: [&str; 9] = [
    "name",
    "role",
    "rank",
    "engine",
    "description",
    "input_requirements",
    "sub_automata",
    "imperatives",
    "instructions",
];

pub fn check_automata(paths: &WorkspacePaths, diagnostics: &mut Diagnostics) {
    let dir_label = &paths.config().automata_dir;
    let files = yaml::yml_files(&paths.automata_dir(), dir_label, diagnostics);
    let known: BTreeSet<&str> = files.iter().map(|(stem, _)| stem.as_str()).collect();

    let mut edges: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (stem, path) in &files {
        let label = format!("{}/{}.yml", dir_label, stem);
        check_automaton_file(paths, stem, path, &label, &known, &mut edges, diagnostics);
    }

    check_delegation_cycles(dir_label, &edges, diagnostics);
}

fn check_automaton_file(
    paths: &WorkspacePaths,
    stem: &str,
    path: &Path,
    label: &str,
    known: &BTreeSet<&str>,
    edges: &mut BTreeMap<String, Vec<String>>,
    diagnostics: &mut Diagnostics,
) {
    if !validate_identifier(stem) {
        diagnostics.push_error(label, "file stem is not a valid automaton id");
    }

    let Some(map) = yaml::load_yaml_mapping(path, label, diagnostics) else {
        return;
    };

    yaml::ensure_known_keys(&map, label, &AUTOMATON_FIELDS, diagnostics);
    yaml::ensure_non_empty_string(&map, label, "name", diagnostics);
    yaml::ensure_non_empty_string(&map, label, "description", diagnostics);
    yaml::ensure_unsigned_int(&map, label, "rank", diagnostics);
    yaml::ensure_string_sequence(&map, label, "input_requirements", diagnostics);
    yaml::ensure_string_sequence(&map, label, "imperatives", diagnostics);
    yaml::ensure_string_sequence(&map, label, "instructions", diagnostics);
    yaml::ensure_string_sequence(&map, label, "sub_automata", diagnostics);

    if let Some(name) = yaml::get_string(&map, "name")
        && !name.trim().is_empty()
        && name != stem
    {
        diagnostics.push_warning(label, format!("name '{}' does not match the file stem", name));
    }

    check_engine(&map, label, diagnostics);

    let role = yaml::get_string(&map, "role");
    let is_function = role.as_deref() == Some(RoleId::FUNCTION);
    check_role(paths, role.as_deref(), label, diagnostics);

    let subs = yaml::get_sequence_strings(&map, "sub_automata");
    for sub in &subs {
        if !validate_identifier(sub) {
            diagnostics
                .push_error(label, format!("sub_automata entry '{}' is not a valid id", sub));
        } else if !known.contains(sub.as_str()) {
            diagnostics
                .push_error(label, format!("sub_automata entry '{}' has no definition file", sub));
        }
    }

    if is_function {
        if !subs.is_empty() {
            diagnostics.push_error(label, "a function automaton cannot declare sub_automata");
        }
        if !SUPPORTED_FUNCTIONS.contains(&stem) {
            diagnostics.push_warning(
                label,
                format!(
                    "'{}' is not a supported function (one of: {})",
                    stem,
                    SUPPORTED_FUNCTIONS.join(", ")
                ),
            );
        }
    } else if subs.is_empty() {
        diagnostics.push_warning(label, "declares no sub_automata; it cannot delegate");
    }

    edges.insert(stem.to_string(), subs);
}

fn check_engine(map: &serde_yaml::Mapping, label: &str, diagnostics: &mut Diagnostics) {
    match map.get(Value::String("engine".to_string())) {
        None => diagnostics
            .push_error(label, "engine is required (null marks an engineless automaton)"),
        Some(Value::Null) => {}
        Some(Value::String(engine)) if KNOWN_ENGINES.contains(&engine.as_str()) => {}
        Some(Value::String(engine)) => {
            diagnostics.push_warning(label, format!("engine '{}' is not a known engine", engine));
        }
        Some(_) => diagnostics.push_error(label, "engine must be a string or null"),
    }
}

fn check_role(
    paths: &WorkspacePaths,
    role: Option<&str>,
    label: &str,
    diagnostics: &mut Diagnostics,
) {
    let Some(role) = role.filter(|value| !value.trim().is_empty()) else {
        diagnostics.push_error(label, "role is required");
        return;
    };
    if role == RoleId::FUNCTION {
        return;
    }
    match RoleId::new(role) {
        Ok(id) if paths.role_file(&id).is_file() => {}
        Ok(id) => diagnostics.push_error(label, format!("role '{}' has no definition file", id)),
        Err(_) => diagnostics.push_error(label, format!("role '{}' is not a valid id", role)),
    }
}

fn check_delegation_cycles(
    dir_label: &str,
    edges: &BTreeMap<String, Vec<String>>,
    diagnostics: &mut Diagnostics,
) {
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    for start in edges.keys() {
        if !visited.contains(start.as_str()) {
            walk(
                start,
                dir_label,
                edges,
                &mut visited,
                &mut BTreeSet::new(),
                &mut Vec::new(),
                diagnostics,
            );
        }
    }
}

/// Depth-first walk; `visiting` holds the current chain for cycle reporting,
/// `visited` keeps cleared definitions from being walked twice.
fn walk<'a>(
    node: &'a str,
    dir_label: &str,
    edges: &'a BTreeMap<String, Vec<String>>,
    visited: &mut BTreeSet<&'a str>,
    visiting: &mut BTreeSet<&'a str>,
    path: &mut Vec<&'a str>,
    diagnostics: &mut Diagnostics,
) {
    if visited.contains(node) {
        return;
    }
    if visiting.contains(node) {
        let mut cycle = path.clone();
        cycle.push(node);
        diagnostics.push_error(
            format!("{}/{}.yml", dir_label, node),
            format!("circular delegation: {}", cycle.join(" -> ")),
        );
        return;
    }

    visiting.insert(node);
    path.push(node);
    if let Some(subs) = edges.get(node) {
        for sub in subs {
            // Missing subs are already reported; only walk real files.
            if edges.contains_key(sub.as_str()) {
                walk(sub, dir_label, edges, visited, visiting, path, diagnostics);
            }
        }
    }
    path.pop();
    visiting.remove(node);
    visited.insert(node);
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::WorkspaceConfig;

    const WORKER_ROLE: &str =
        "description: Works through tasks.\noutput_format: \"Pick one of [{tool_names}].\"\n";

    fn check(automata: &[(&str, &str)]) -> Diagnostics {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("roles")).unwrap();
        fs::write(dir.path().join("roles/worker.yml"), WORKER_ROLE).unwrap();
        let automata_dir = dir.path().join("automata");
        fs::create_dir_all(&automata_dir).unwrap();
        for (name, content) in automata {
            fs::write(automata_dir.join(name), content).unwrap();
        }
        let paths = WorkspacePaths::new(dir.path().to_path_buf(), WorkspaceConfig::default());
        let mut diagnostics = Diagnostics::default();
        check_automata(&paths, &mut diagnostics);
        diagnostics
    }

    fn delegate(name: &str, subs: &str) -> String {
        format!(
            "name: {name}\nrole: worker\nrank: 1\nengine: gpt-4\n\
             description: Does {name} things.\nsub_automata:\n{subs}"
        )
    }

    const SAVE_FILE: &str = "name: save_file\nrole: function\nrank: 0\nengine: null\n\
                             description: Writes a file.\n";

    #[test]
    fn clean_set_passes() {
        let diagnostics =
            check(&[("top.yml", &delegate("top", "  - save_file\n")), ("save_file.yml", SAVE_FILE)]);
        assert_eq!(diagnostics.error_count(), 0);
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[test]
    fn missing_role_file_is_an_error() {
        let diagnostics = check(&[(
            "solo.yml",
            "name: solo\nrole: ghost\nrank: 1\nengine: gpt-4\ndescription: d\n\
             sub_automata:\n  - solo2\n",
        )]);
        assert!(
            diagnostics
                .error_messages()
                .iter()
                .any(|m| m.contains("role 'ghost' has no definition file"))
        );
    }

    #[test]
    fn unknown_sub_is_an_error() {
        let diagnostics = check(&[("top.yml", &delegate("top", "  - ghost\n"))]);
        assert!(
            diagnostics
                .error_messages()
                .iter()
                .any(|m| m.contains("sub_automata entry 'ghost' has no definition file"))
        );
    }

    #[test]
    fn function_with_subs_is_an_error() {
        let diagnostics = check(&[(
            "save_file.yml",
            "name: save_file\nrole: function\nrank: 0\nengine: null\ndescription: d\n\
             sub_automata:\n  - save_file\n",
        )]);
        assert!(
            diagnostics
                .error_messages()
                .iter()
                .any(|m| m.contains("function automaton cannot declare sub_automata"))
        );
    }

    #[test]
    fn delegator_without_subs_is_a_warning() {
        let diagnostics = check(&[(
            "solo.yml",
            "name: solo\nrole: worker\nrank: 1\nengine: gpt-4\ndescription: d\n",
        )]);
        assert_eq!(diagnostics.error_count(), 0);
        assert!(
            diagnostics
                .warning_messages()
                .iter()
                .any(|m| m.contains("declares no sub_automata"))
        );
    }

    #[test]
    fn unknown_engine_is_a_warning() {
        let diagnostics = check(&[
            (
                "solo.yml",
                "name: solo\nrole: worker\nrank: 1\nengine: gpt-99\ndescription: d\n\
                 sub_automata:\n  - save_file\n",
            ),
            ("save_file.yml", SAVE_FILE),
        ]);
        assert_eq!(diagnostics.error_count(), 0);
        assert!(
            diagnostics
                .warning_messages()
                .iter()
                .any(|m| m.contains("engine 'gpt-99' is not a known engine"))
        );
    }

    #[test]
    fn absent_engine_key_is_an_error() {
        let diagnostics = check(&[
            (
                "solo.yml",
                "name: solo\nrole: worker\nrank: 1\ndescription: d\n\
                 sub_automata:\n  - save_file\n",
            ),
            ("save_file.yml", SAVE_FILE),
        ]);
        assert!(diagnostics.error_messages().iter().any(|m| m.contains("engine is required")));
    }

    #[test]
    fn unsupported_function_name_is_a_warning() {
        let diagnostics = check(&[(
            "teleport.yml",
            "name: teleport\nrole: function\nrank: 0\nengine: null\ndescription: d\n",
        )]);
        assert!(
            diagnostics
                .warning_messages()
                .iter()
                .any(|m| m.contains("'teleport' is not a supported function"))
        );
    }

    #[test]
    fn name_stem_mismatch_is_a_warning() {
        let diagnostics = check(&[(
            "save_file.yml",
            "name: file_saver\nrole: function\nrank: 0\nengine: null\ndescription: d\n",
        )]);
        assert!(
            diagnostics
                .warning_messages()
                .iter()
                .any(|m| m.contains("name 'file_saver' does not match the file stem"))
        );
    }

    #[test]
    fn delegation_cycle_is_an_error() {
        let diagnostics = check(&[
            ("a.yml", &delegate("a", "  - b\n")),
            ("b.yml", &delegate("b", "  - a\n")),
        ]);
        assert!(
            diagnostics
                .error_messages()
                .iter()
                .any(|m| m.contains("circular delegation: a -> b -> a"))
        );
    }

    #[test]
    fn self_delegation_is_a_cycle() {
        let diagnostics = check(&[("loop.yml", &delegate("loop", "  - loop\n"))]);
        assert!(
            diagnostics
                .error_messages()
                .iter()
                .any(|m| m.contains("circular delegation: loop -> loop"))
        );
    }

    #[test]
    fn diamond_delegation_is_not_a_cycle() {
        let diagnostics = check(&[
            ("top.yml", &delegate("top", "  - left\n  - right\n")),
            ("left.yml", &delegate("left", "  - save_file\n")),
            ("right.yml", &delegate("right", "  - save_file\n")),
            ("save_file.yml", SAVE_FILE),
        ]);
        assert_eq!(diagnostics.error_count(), 0);
    }

    #[test]
    fn rank_must_be_unsigned() {
        let diagnostics = check(&[
            (
                "solo.yml",
                "name: solo\nrole: worker\nrank: -2\nengine: gpt-4\ndescription: d\n\
                 sub_automata:\n  - save_file\n",
            ),
            ("save_file.yml", SAVE_FILE),
        ]);
        assert!(
            diagnostics
                .error_messages()
                .iter()
                .any(|m| m.contains("rank must be an unsigned integer"))
        );
    }
}
