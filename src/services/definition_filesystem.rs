use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::workspace::{CONFIG_FILE, WorkspaceConfig, WorkspacePaths};
use crate::domain::{AppError, AutomatonDefinition, AutomatonId, RoleDefinition, RoleId};
use crate::ports::DefinitionStore;

/// Filesystem-backed definition store.
///
/// Opening a store reads the workspace's `rolo.toml` when present, so all
/// paths honor the configured layout.
#[derive(Debug, Clone)]
pub struct FilesystemDefinitionStore {
    paths: WorkspacePaths,
}

impl FilesystemDefinitionStore {
    /// Open a store rooted at the given directory.
    pub fn open(root: PathBuf) -> Result<Self, AppError> {
        let config_path = root.join(CONFIG_FILE);
        let config = if config_path.is_file() {
            WorkspaceConfig::parse_toml(&fs::read_to_string(&config_path)?)?
        } else {
            WorkspaceConfig::default()
        };
        Ok(Self { paths: WorkspacePaths::new(root, config) })
    }

    /// Open a store for the current directory.
    pub fn current() -> Result<Self, AppError> {
        let cwd = std::env::current_dir()?;
        Self::open(cwd)
    }

    pub fn paths(&self) -> &WorkspacePaths {
        &self.paths
    }

    fn role_source(&self, id: &RoleId) -> Result<String, AppError> {
        let path = self.paths.role_file(id);
        if !path.is_file() {
            return Err(AppError::RoleNotFound(id.to_string()));
        }
        fs::read_to_string(path).map_err(AppError::from)
    }

    fn automaton_source(&self, id: &AutomatonId) -> Result<String, AppError> {
        let path = self.paths.automaton_file(id);
        if !path.is_file() {
            return Err(AppError::AutomatonNotFound(id.to_string()));
        }
        fs::read_to_string(path).map_err(AppError::from)
    }

    /// Stems of the `.yml` files in a directory, sorted. A missing directory
    /// lists as empty.
    fn list_stems(dir: &Path) -> Result<Vec<String>, AppError> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut stems = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("yml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                stems.push(stem.to_string());
            }
        }
        stems.sort();
        Ok(stems)
    }
}

impl DefinitionStore for FilesystemDefinitionStore {
    fn exists(&self) -> bool {
        self.paths.roles_dir().is_dir() || self.paths.automata_dir().is_dir()
    }

    fn list_roles(&self) -> Result<Vec<RoleId>, AppError> {
        let stems = Self::list_stems(&self.paths.roles_dir())?;
        // Files whose stem is not a valid id are someone else's business.
        Ok(stems.iter().filter_map(|stem| RoleId::new(stem).ok()).collect())
    }

    fn list_automata(&self) -> Result<Vec<AutomatonId>, AppError> {
        let stems = Self::list_stems(&self.paths.automata_dir())?;
        Ok(stems.iter().filter_map(|stem| AutomatonId::new(stem).ok()).collect())
    }

    fn has_role(&self, id: &RoleId) -> bool {
        self.paths.role_file(id).is_file()
    }

    fn has_automaton(&self, id: &AutomatonId) -> bool {
        self.paths.automaton_file(id).is_file()
    }

    fn role(&self, id: &RoleId) -> Result<RoleDefinition, AppError> {
        let source = self.role_source(id)?;
        RoleDefinition::parse_yaml(&source, &self.role_label(id))
    }

    fn automaton(&self, id: &AutomatonId) -> Result<AutomatonDefinition, AppError> {
        let source = self.automaton_source(id)?;
        AutomatonDefinition::parse_yaml(&source, &self.automaton_label(id))
    }

    fn role_label(&self, id: &RoleId) -> String {
        format!("{}/{}.yml", self.paths.config().roles_dir, id)
    }

    fn automaton_label(&self, id: &AutomatonId) -> String {
        format!("{}/{}.yml", self.paths.config().automata_dir, id)
    }

    fn assembly_template(&self) -> Result<Option<String>, AppError> {
        let path = self.paths.assembly_template_file();
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write_file(&self, relative_path: &str, content: &str) -> Result<(), AppError> {
        let path = self.paths.root().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn write_role(&self, id: &RoleId, content: &str) -> Result<(), AppError> {
        if self.has_role(id) {
            return Err(AppError::DefinitionExists { kind: "Role", id: id.to_string() });
        }
        let path = self.paths.role_file(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn write_automaton(&self, id: &AutomatonId, content: &str) -> Result<(), AppError> {
        if self.has_automaton(id) {
            return Err(AppError::DefinitionExists { kind: "Automaton", id: id.to_string() });
        }
        let path = self.paths.automaton_file(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, FilesystemDefinitionStore) {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = FilesystemDefinitionStore::open(dir.path().to_path_buf())
            .expect("open should succeed");
        (dir, store)
    }

    fn role_id(s: &str) -> RoleId {
        RoleId::new(s).unwrap()
    }

    const WORKER_YAML: &str = "description: Works through tasks.\n\
                               output_format: \"Pick one of [{tool_names}].\"\n";

    #[test]
    fn empty_directory_is_not_a_workspace() {
        let (_dir, store) = test_store();
        assert!(!store.exists());
    }

    #[test]
    fn listing_skips_foreign_files() {
        let (dir, store) = test_store();
        let roles = dir.path().join("roles");
        fs::create_dir_all(&roles).unwrap();
        fs::write(roles.join("worker.yml"), WORKER_YAML).unwrap();
        fs::write(roles.join("zebra.yml"), WORKER_YAML).unwrap();
        fs::write(roles.join("notes.txt"), "scratch").unwrap();
        fs::write(roles.join("bad.name.yml"), WORKER_YAML).unwrap();

        let ids = store.list_roles().unwrap();
        let names: Vec<_> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(names, vec!["worker", "zebra"]);
        assert!(store.exists());
    }

    #[test]
    fn role_loads_and_reports_missing() {
        let (dir, store) = test_store();
        let roles = dir.path().join("roles");
        fs::create_dir_all(&roles).unwrap();
        fs::write(roles.join("worker.yml"), WORKER_YAML).unwrap();

        let role = store.role(&role_id("worker")).unwrap();
        assert_eq!(role.description, "Works through tasks.");

        let err = store.role(&role_id("ghost")).unwrap_err();
        assert!(matches!(err, AppError::RoleNotFound(name) if name == "ghost"));
    }

    #[test]
    fn load_error_names_the_file() {
        let (dir, store) = test_store();
        let roles = dir.path().join("roles");
        fs::create_dir_all(&roles).unwrap();
        fs::write(roles.join("broken.yml"), "description: only\n").unwrap();

        let err = store.role(&role_id("broken")).unwrap_err();
        match err {
            AppError::MissingField { what, field } => {
                assert_eq!(what, "roles/broken.yml");
                assert_eq!(field, "output_format");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn config_overrides_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("rolo.toml"), "[paths]\nroles = \"profiles\"\n").unwrap();
        let profiles = dir.path().join("profiles");
        fs::create_dir_all(&profiles).unwrap();
        fs::write(profiles.join("worker.yml"), WORKER_YAML).unwrap();

        let store = FilesystemDefinitionStore::open(dir.path().to_path_buf()).unwrap();
        assert!(store.has_role(&role_id("worker")));
        assert_eq!(store.list_roles().unwrap().len(), 1);
    }

    #[test]
    fn write_role_refuses_duplicates() {
        let (_dir, store) = test_store();
        let id = role_id("worker");
        store.write_role(&id, WORKER_YAML).unwrap();

        let err = store.write_role(&id, WORKER_YAML).unwrap_err();
        assert!(matches!(err, AppError::DefinitionExists { kind: "Role", .. }));
    }

    #[test]
    fn assembly_template_is_optional() {
        let (dir, store) = test_store();
        assert!(store.assembly_template().unwrap().is_none());

        let templates = dir.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("automaton_prompt.j2"), "{{ automaton_name }}").unwrap();
        assert_eq!(store.assembly_template().unwrap().as_deref(), Some("{{ automaton_name }}"));
    }
}
