use include_dir::{Dir, DirEntry, include_dir};

use crate::domain::{AutomatonId, RoleId};
use crate::ports::{AssetStore, ScaffoldFile};

static SCAFFOLD_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/scaffold");

/// Starter definitions for `rolo new`.
mod starters {
    pub static ROLE: &str = include_str!("../assets/starters/role.yml");
    pub static AUTOMATON: &str = include_str!("../assets/starters/automaton.yml");
}

/// Embedded asset store implementation.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedAssetStore;

impl EmbeddedAssetStore {
    pub fn new() -> Self {
        Self
    }
}

impl AssetStore for EmbeddedAssetStore {
    fn scaffold_files(&self) -> Vec<ScaffoldFile> {
        let mut files = Vec::new();
        collect_files(&SCAFFOLD_DIR, &mut files);
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    fn starter_role(&self, id: &RoleId) -> String {
        starters::ROLE.replace("ROLE_NAME", id.as_str())
    }

    fn starter_automaton(&self, id: &AutomatonId) -> String {
        starters::AUTOMATON.replace("AUTOMATON_NAME", id.as_str())
    }

    fn assembly_template(&self) -> &str {
        include_str!("../assets/scaffold/templates/automaton_prompt.j2")
    }
}

fn collect_files(dir: &'static Dir, files: &mut Vec<ScaffoldFile>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::File(file) => {
                if let Some(content) = file.contents_utf8() {
                    let path = file.path().to_string_lossy().to_string();
                    files.push(ScaffoldFile { path, content: content.to_string() });
                }
            }
            DirEntry::Dir(subdir) => collect_files(subdir, files),
        }
    }
}
