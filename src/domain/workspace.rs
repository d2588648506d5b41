use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::AppError;
use super::id::{AutomatonId, RoleId};

/// The workspace configuration file.
pub const CONFIG_FILE: &str = "rolo.toml";

/// File name of the workspace-owned assembly template.
pub const ASSEMBLY_TEMPLATE_FILE: &str = "automaton_prompt.j2";

/// Tool configuration, loaded from an optional `rolo.toml`.
///
/// Every field has a default; a missing file means a default config, while
/// a file that does not parse is still an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Directory holding `<id>.yml` role definitions.
    pub roles_dir: String,
    /// Directory holding `<id>.yml` automaton definitions.
    pub automata_dir: String,
    /// Directory holding the assembly template.
    pub templates_dir: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            roles_dir: default_roles_dir(),
            automata_dir: default_automata_dir(),
            templates_dir: default_templates_dir(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDto {
    #[serde(default)]
    paths: PathsDto,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PathsDto {
    #[serde(default = "default_roles_dir")]
    roles: String,
    #[serde(default = "default_automata_dir")]
    automata: String,
    #[serde(default = "default_templates_dir")]
    templates: String,
}

impl Default for PathsDto {
    fn default() -> Self {
        Self {
            roles: default_roles_dir(),
            automata: default_automata_dir(),
            templates: default_templates_dir(),
        }
    }
}

fn default_roles_dir() -> String {
    "roles".to_string()
}

fn default_automata_dir() -> String {
    "automata".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

impl WorkspaceConfig {
    /// Parse configuration from TOML text.
    pub fn parse_toml(content: &str) -> Result<Self, AppError> {
        let dto: ConfigDto = toml::from_str(content)
            .map_err(|err| AppError::malformed(CONFIG_FILE, err.to_string()))?;
        Ok(Self {
            roles_dir: dto.paths.roles,
            automata_dir: dto.paths.automata,
            templates_dir: dto.paths.templates,
        })
    }
}

/// Resolved locations of everything in a workspace.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    root: PathBuf,
    config: WorkspaceConfig,
}

impl WorkspacePaths {
    pub fn new(root: PathBuf, config: WorkspaceConfig) -> Self {
        Self { root, config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn roles_dir(&self) -> PathBuf {
        self.root.join(&self.config.roles_dir)
    }

    pub fn role_file(&self, id: &RoleId) -> PathBuf {
        self.roles_dir().join(format!("{}.yml", id))
    }

    pub fn automata_dir(&self) -> PathBuf {
        self.root.join(&self.config.automata_dir)
    }

    pub fn automaton_file(&self, id: &AutomatonId) -> PathBuf {
        self.automata_dir().join(format!("{}.yml", id))
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(&self.config.templates_dir)
    }

    pub fn assembly_template_file(&self) -> PathBuf {
        self.templates_dir().join(ASSEMBLY_TEMPLATE_FILE)
    }
}
