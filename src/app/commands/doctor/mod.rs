mod automata;
mod diagnostics;
mod roles;
mod yaml;

use std::fs;

use minijinja::Environment;

use crate::domain::AppError;
use crate::domain::workspace::{ASSEMBLY_TEMPLATE_FILE, WorkspacePaths};

pub use diagnostics::{Diagnostic, Diagnostics, Severity};

#[derive(Debug, Clone, Default)]
pub struct DoctorOptions {
    pub strict: bool,
}

#[derive(Debug, Clone)]
pub struct DoctorOutcome {
    pub errors: usize,
    pub warnings: usize,
    pub exit_code: i32,
}

/// Run every check over the workspace and report to stderr.
///
/// Exit code 1 when errors were found, 2 when `strict` promotes warnings
/// to failures, 0 otherwise.
pub fn execute(paths: &WorkspacePaths, options: DoctorOptions) -> Result<DoctorOutcome, AppError> {
    let mut diagnostics = Diagnostics::default();

    roles::check_roles(paths, &mut diagnostics);
    automata::check_automata(paths, &mut diagnostics);
    check_assembly_template(paths, &mut diagnostics);

    diagnostics.emit();

    let errors = diagnostics.error_count();
    let warnings = diagnostics.warning_count();
    let exit_code = if errors > 0 {
        1
    } else if warnings > 0 && options.strict {
        2
    } else {
        0
    };

    if errors == 0 && warnings == 0 {
        println!("All checks passed.");
    } else if errors == 0 && !options.strict {
        eprintln!("Check completed with {} warning(s).", warnings);
    } else {
        eprintln!("Check failed: {} error(s), {} warning(s) found.", errors, warnings);
    }

    Ok(DoctorOutcome { errors, warnings, exit_code })
}

fn check_assembly_template(paths: &WorkspacePaths, diagnostics: &mut Diagnostics) {
    let label = format!("{}/{}", paths.config().templates_dir, ASSEMBLY_TEMPLATE_FILE);
    let path = paths.assembly_template_file();
    if !path.is_file() {
        diagnostics
            .push_warning(label, "not found; preview falls back to the built-in template");
        return;
    }

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            diagnostics.push_error(label, err.to_string());
            return;
        }
    };

    let env = Environment::new();
    if let Err(err) = env.template_from_str(&source) {
        diagnostics.push_error(label, format!("template does not parse: {}", err));
    }
}
