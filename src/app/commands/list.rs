use serde::Serialize;

use crate::domain::AppError;
use crate::ports::DefinitionStore;

/// One role in a listing.
#[derive(Debug, Clone, Serialize)]
pub struct RoleListing {
    pub id: String,
    pub description: String,
}

/// One automaton in a listing.
#[derive(Debug, Clone, Serialize)]
pub struct AutomatonListing {
    pub id: String,
    pub role: String,
    pub rank: u32,
    pub description: String,
}

/// Everything `rolo list` reports.
#[derive(Debug, Clone, Serialize)]
pub struct ListOutput {
    pub roles: Vec<RoleListing>,
    pub automata: Vec<AutomatonListing>,
}

impl ListOutput {
    /// Render the listing for terminal output.
    pub fn render_text(&self) -> String {
        let mut out = String::from("Roles:\n");
        if self.roles.is_empty() {
            out.push_str("  (none)\n");
        }
        for role in &self.roles {
            out.push_str(&format!("  {}: {}\n", role.id, role.description));
        }
        out.push_str("\nAutomata:\n");
        if self.automata.is_empty() {
            out.push_str("  (none)\n");
        }
        for automaton in &self.automata {
            out.push_str(&format!(
                "  {} ({} {}): {}\n",
                automaton.id, automaton.role, automaton.rank, automaton.description
            ));
        }
        out
    }

    /// Render the listing as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Internal(format!("Failed to serialize listing: {}", err)))
    }
}

/// Collect ids and one-line summaries of every definition in the workspace.
///
/// Ids come back sorted (the store lists them that way). A definition that
/// fails to load fails the whole listing; `rolo doctor` narrows down which
/// file is at fault.
pub fn execute<S: DefinitionStore>(store: &S) -> Result<ListOutput, AppError> {
    let mut roles = Vec::new();
    for id in store.list_roles()? {
        let role = store.role(&id)?;
        roles.push(RoleListing {
            id: id.to_string(),
            description: first_line(&role.description),
        });
    }

    let mut automata = Vec::new();
    for id in store.list_automata()? {
        let automaton = store.automaton(&id)?;
        automata.push(AutomatonListing {
            id: id.to_string(),
            role: automaton.role.to_string(),
            rank: automaton.rank,
            description: first_line(&automaton.description),
        });
    }

    Ok(ListOutput { roles, automata })
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().to_string()
}
