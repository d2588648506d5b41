//! Shared testing harness for `rolo` integration tests.

use assert_cmd::Command;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated environment for CLI exercises.
pub(crate) struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

impl TestContext {
    /// Create a new isolated environment.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");

        Self { root, work_dir }
    }

    /// Absolute path to the emulated `$HOME` directory.
    pub(crate) fn home(&self) -> &Path {
        self.root.path()
    }

    /// Path to the workspace directory used for CLI invocations.
    pub(crate) fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a command for invoking the compiled `rolo` binary within the default workspace.
    pub(crate) fn cli(&self) -> Command {
        self.cli_in(self.work_dir())
    }

    /// Build a command for invoking the compiled `rolo` binary within a custom directory.
    pub(crate) fn cli_in<P: AsRef<Path>>(&self, dir: P) -> Command {
        let mut cmd = Command::cargo_bin("rolo").expect("Failed to locate rolo binary");
        cmd.current_dir(dir.as_ref()).env("HOME", self.home());
        cmd
    }

    /// Run `rolo init` and assert success.
    pub(crate) fn init(&self) {
        self.cli().arg("init").assert().success();
    }

    /// Path to the `roles/` directory in the work directory.
    pub(crate) fn roles_path(&self) -> PathBuf {
        self.work_dir.join("roles")
    }

    /// Path to the `automata/` directory in the work directory.
    pub(crate) fn automata_path(&self) -> PathBuf {
        self.work_dir.join("automata")
    }

    /// Path to the assembly template in the work directory.
    pub(crate) fn assembly_template_path(&self) -> PathBuf {
        self.work_dir.join("templates").join("automaton_prompt.j2")
    }

    /// Write a role definition file into the workspace.
    pub(crate) fn write_role(&self, id: &str, content: &str) {
        fs::create_dir_all(self.roles_path()).expect("Failed to create roles directory");
        fs::write(self.roles_path().join(format!("{}.yml", id)), content)
            .expect("Failed to write role definition");
    }

    /// Write an automaton definition file into the workspace.
    pub(crate) fn write_automaton(&self, id: &str, content: &str) {
        fs::create_dir_all(self.automata_path()).expect("Failed to create automata directory");
        fs::write(self.automata_path().join(format!("{}.yml", id)), content)
            .expect("Failed to write automaton definition");
    }

    /// Assert that the workspace scaffold directories exist.
    pub(crate) fn assert_workspace_exists(&self) {
        assert!(self.roles_path().exists(), "roles directory should exist");
        assert!(self.automata_path().exists(), "automata directory should exist");
    }

    /// Execute a closure after temporarily switching into the work directory.
    ///
    /// Mutates the process-wide current directory; callers must serialize.
    pub(crate) fn with_work_dir<F, R>(&self, action: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::current_dir().expect("Failed to capture current dir");
        env::set_current_dir(&self.work_dir).expect("Failed to switch current dir");
        let result = action();
        env::set_current_dir(original).expect("Failed to restore current dir");
        result
    }
}
