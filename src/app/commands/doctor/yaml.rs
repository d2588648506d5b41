use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use super::diagnostics::Diagnostics;

/// Stem and path of every `.yml` file in `dir`, sorted by stem.
///
/// A missing directory lists as empty; an unreadable one is an error
/// against `dir_label`.
pub fn yml_files(
    dir: &Path,
    dir_label: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<(String, PathBuf)> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            diagnostics.push_error(dir_label, format!("Failed to read directory: {}", err));
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                diagnostics
                    .push_error(dir_label, format!("Failed to read directory entry: {}", err));
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("yml") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            files.push((stem.to_string(), path));
        }
    }
    files.sort();
    files
}

pub fn load_yaml_mapping(
    path: &Path,
    label: &str,
    diagnostics: &mut Diagnostics,
) -> Option<Mapping> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            diagnostics.push_error(label, err.to_string());
            return None;
        }
    };

    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(map)) => Some(map),
        Ok(_) => {
            diagnostics.push_error(label, "YAML root is not a mapping");
            None
        }
        Err(err) => {
            diagnostics.push_error(label, err.to_string());
            None
        }
    }
}

pub fn get_string(map: &Mapping, key: &str) -> Option<String> {
    map.get(Value::String(key.to_string())).and_then(|value| match value {
        Value::String(value) => Some(value.clone()),
        _ => None,
    })
}

pub fn get_sequence_strings(map: &Mapping, key: &str) -> Vec<String> {
    let Some(Value::Sequence(values)) = map.get(Value::String(key.to_string())) else {
        return Vec::new();
    };
    values
        .iter()
        .filter_map(|value| match value {
            Value::String(text) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Flag any key outside `known`; the loader rejects those files outright.
pub fn ensure_known_keys(
    map: &Mapping,
    label: &str,
    known: &[&str],
    diagnostics: &mut Diagnostics,
) {
    for key in map.keys() {
        let Value::String(name) = key else {
            diagnostics.push_error(label, "keys must be strings");
            continue;
        };
        if !known.contains(&name.as_str()) {
            diagnostics.push_error(label, format!("unknown field '{}'", name));
        }
    }
}

pub fn ensure_non_empty_string(
    map: &Mapping,
    label: &str,
    key: &str,
    diagnostics: &mut Diagnostics,
) {
    if get_string(map, key).map(|value| value.trim().is_empty()).unwrap_or(true) {
        diagnostics.push_error(label, format!("{} is required", key));
    }
}

/// Accept an absent key (the loader defaults it to empty), but a present one
/// must be a sequence of strings.
pub fn ensure_string_sequence(
    map: &Mapping,
    label: &str,
    key: &str,
    diagnostics: &mut Diagnostics,
) {
    let Some(value) = map.get(Value::String(key.to_string())) else {
        return;
    };
    match value {
        Value::Sequence(values) => {
            if values.iter().any(|entry| !matches!(entry, Value::String(_))) {
                diagnostics.push_error(label, format!("{} entries must be strings", key));
            }
        }
        _ => diagnostics.push_error(label, format!("{} must be a sequence of strings", key)),
    }
}

pub fn ensure_unsigned_int(
    map: &Mapping,
    label: &str,
    key: &str,
    diagnostics: &mut Diagnostics,
) {
    match map.get(Value::String(key.to_string())) {
        Some(Value::Number(number)) if number.as_u64().is_some() => {}
        Some(_) => {
            diagnostics.push_error(label, format!("{} must be an unsigned integer", key));
        }
        None => diagnostics.push_error(label, format!("{} is required", key)),
    }
}
