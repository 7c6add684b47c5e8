//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Value as JsonValue, json};
use tempfile::TempDir;

/// Builder for a scratch directory holding config, filter and record files
pub struct WorkspaceBuilder {
    temp_dir: TempDir,
}

impl WorkspaceBuilder {
    /// Create a new builder with an empty directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the workspace directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a config.toml with the given content
    pub fn with_config(self, content: &str) -> Self {
        fs::write(self.temp_dir.path().join("config.toml"), content)
            .expect("Failed to write config.toml");
        self
    }

    /// Add a filters.txt with one filter per line
    pub fn with_filters(self, lines: &[&str]) -> Self {
        fs::write(self.temp_dir.path().join("filters.txt"), lines.join("\n"))
            .expect("Failed to write filters.txt");
        self
    }

    /// Add a records.json holding the given records as a JSON array
    pub fn with_records(self, records: &[RecordBuilder]) -> Self {
        let array = JsonValue::Array(records.iter().map(RecordBuilder::build).collect());
        fs::write(self.temp_dir.path().join("records.json"), array.to_string())
            .expect("Failed to write records.json");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for OneRoster user records
pub struct RecordBuilder {
    sourced_id: String,
    status: String,
    role: String,
    given_name: String,
    enabled_user: bool,
    score: Option<f64>,
    date_last_modified: String,
    grades: Vec<String>,
}

impl RecordBuilder {
    /// Create an active student with default values
    pub fn new(sourced_id: &str) -> Self {
        Self {
            sourced_id: sourced_id.to_string(),
            status: "active".to_string(),
            role: "student".to_string(),
            given_name: "Test".to_string(),
            enabled_user: true,
            score: None,
            date_last_modified: "2024-06-15T12:00:00.000Z".to_string(),
            grades: vec!["09".to_string()],
        }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.role = role.to_string();
        self
    }

    pub fn given_name(mut self, given_name: &str) -> Self {
        self.given_name = given_name.to_string();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled_user = enabled;
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn modified(mut self, date: &str) -> Self {
        self.date_last_modified = date.to_string();
        self
    }

    pub fn grades(mut self, grades: &[&str]) -> Self {
        self.grades = grades.iter().map(|g| g.to_string()).collect();
        self
    }

    /// Convert to a JSON object
    pub fn build(&self) -> JsonValue {
        let mut record = json!({
            "sourcedId": self.sourced_id,
            "status": self.status,
            "role": self.role,
            "givenName": self.given_name,
            "enabledUser": self.enabled_user.to_string(),
            "dateLastModified": self.date_last_modified,
            "grades": self.grades,
        });
        if let Some(score) = self.score {
            record["score"] = json!(score);
        }
        record
    }
}

/// Path of a file inside a workspace
pub fn file_in(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// Command for the CLI binary isolated from the developer's own config
pub fn cli_command(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_oneroster-filter"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("ONEROSTER_FILTER_CONFIG");
    cmd
}

/// Sample filters covering every operator and grouping form
pub fn sample_filters() -> Vec<&'static str> {
    vec![
        "status='active'",
        "score>=90",
        "score<-2.5",
        "status!='tobedeleted'",
        "dateLastModified>'2024-01-01'",
        "dateLastModified<='2024-06-15T12:00:00.250Z'",
        "enabledUser=TRUE",
        "givenName~'ann'",
        "name=\"O'Brien\"",
        "status='active' AND role='student'",
        "role='teacher' OR role='administrator'",
        "(status='active' OR status='tobedeleted') AND role='teacher'",
        "status='active' OR role='student' AND enabledUser='true'",
        "a=1 AND (b=2 OR (c=3 AND d=4)) OR e=5",
        "note='x AND y' AND title='(draft)'",
    ]
}
