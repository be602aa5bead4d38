// crates/rollcall-cli/src/services/storage.rs - Roster persistence service
//
// The roster is persisted as one JSON file, loaded whole at startup and
// rewritten whole after every mutating command. This service knows HOW to
// read and write that file; it makes no decisions about WHEN (the shell
// does, driven by Outcome::mutated).

use anyhow::{Context as AnyhowContext, Result};
use std::fs;
use std::path::{Path, PathBuf};

use rollcall_core::{Roster, Student};

/// Handles loading and saving the roster data file
pub struct StorageService {
    data_path: PathBuf,
}

impl StorageService {
    pub fn new(data_path: PathBuf) -> Self {
        Self { data_path }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Load the roster. A missing file is not an error: a fresh roster
    /// starts empty. A present-but-invalid file is an error; silently
    /// starting empty would overwrite the user's data on the next save.
    pub fn load(&self) -> Result<Roster> {
        if !self.data_path.exists() {
            tracing::debug!(path = %self.data_path.display(), "no data file, starting empty");
            return Ok(Roster::new());
        }
        let content = fs::read_to_string(&self.data_path)
            .with_context(|| format!("failed to read {}", self.data_path.display()))?;
        let students: Vec<Student> = serde_json::from_str(&content)
            .with_context(|| format!("invalid roster data in {}", self.data_path.display()))?;
        let roster = Roster::from_students(students)
            .with_context(|| format!("invalid roster data in {}", self.data_path.display()))?;
        tracing::debug!(students = roster.len(), "roster loaded");
        Ok(roster)
    }

    /// Write the whole roster out. The display filter is not persisted.
    pub fn save(&self, roster: &Roster) -> Result<()> {
        if let Some(parent) = self.data_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create directory {}", parent.display())
                })?;
            }
        }
        let content = serde_json::to_string_pretty(roster.students())
            .context("failed to serialize roster")?;
        fs::write(&self.data_path, content)
            .with_context(|| format!("failed to write {}", self.data_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{interpret_and_execute, Roster};
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> StorageService {
        StorageService::new(dir.path().join("roster.json"))
    }

    #[test]
    fn missing_file_loads_an_empty_roster() {
        let dir = TempDir::new().unwrap();
        let roster = storage(&dir).load().unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn roster_round_trips_through_json() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let mut roster = Roster::new();
        interpret_and_execute(
            "add n=John Doe p=91234567 e=j@example.com c=4A t=quiet",
            &mut roster,
        )
        .unwrap();
        interpret_and_execute("assign a=HW 1 n=John Doe", &mut roster).unwrap();
        interpret_and_execute("mark a=HW 1 n=John Doe", &mut roster).unwrap();

        storage.save(&roster).unwrap();
        let loaded = storage.load().unwrap();
        assert_eq!(loaded, roster);
        assert!(loaded.students()[0].assignments()[0].is_done());
    }

    #[test]
    fn corrupt_files_are_an_error_not_an_empty_roster() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        fs::write(storage.data_path(), "not json").unwrap();
        assert!(storage.load().is_err());
    }

    #[test]
    fn duplicate_identities_in_the_file_are_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        let duplicated = r#"[
            {"name": "John Doe", "phone": "999", "email": "j@example.com", "class": "4A"},
            {"name": "john doe", "phone": "888", "email": "k@example.com", "class": "5B"}
        ]"#;
        fs::write(storage.data_path(), duplicated).unwrap();
        assert!(storage.load().is_err());
    }
}
