use std::path::Path;

use super::diagnostics::Diagnostics;
use super::yaml;
use crate::domain::FormatTemplate;
use crate::domain::id::validate_identifier;
use crate::domain::workspace::WorkspacePaths;

const ROLE_FIELDS: [&str; 4] = ["description", "imperatives", "instructions", "output_format"];

pub fn check_roles(paths: &WorkspacePaths, diagnostics: &mut Diagnostics) {
    let dir_label = &paths.config().roles_dir;
    for (stem, path) in yaml::yml_files(&paths.roles_dir(), dir_label, diagnostics) {
        let label = format!("{}/{}.yml", dir_label, stem);
        check_role_file(&stem, &path, &label, diagnostics);
    }
}

fn check_role_file(stem: &str, path: &Path, label: &str, diagnostics: &mut Diagnostics) {
    if !validate_identifier(stem) {
        diagnostics.push_error(label, "file stem is not a valid role id");
    }

    let Some(map) = yaml::load_yaml_mapping(path, label, diagnostics) else {
        return;
    };

    yaml::ensure_known_keys(&map, label, &ROLE_FIELDS, diagnostics);
    yaml::ensure_non_empty_string(&map, label, "description", diagnostics);
    yaml::ensure_string_sequence(&map, label, "imperatives", diagnostics);
    yaml::ensure_string_sequence(&map, label, "instructions", diagnostics);
    check_output_format(&map, label, diagnostics);
}

fn check_output_format(map: &serde_yaml::Mapping, label: &str, diagnostics: &mut Diagnostics) {
    let Some(text) = yaml::get_string(map, "output_format").filter(|t| !t.trim().is_empty())
    else {
        diagnostics.push_error(label, "output_format is required");
        return;
    };

    match FormatTemplate::parse(&text) {
        Ok(template) => {
            for name in template.placeholders() {
                if name != "tool_names" {
                    diagnostics.push_warning(
                        label,
                        format!(
                            "output_format references '{{{}}}'; assembly only supplies '{{tool_names}}'",
                            name
                        ),
                    );
                }
            }
        }
        Err(err) => {
            diagnostics.push_error(label, format!("output_format does not parse: {}", err));
        }
    }
}
