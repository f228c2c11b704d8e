//! Battle log - ordered narration of a battle

use serde::{Deserialize, Serialize};

/// Append-only list of human-readable battle events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BattleLog {
    entries: Vec<String>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// Lines appended at or after `index`
    pub fn since(&self, index: usize) -> &[String] {
        self.entries.get(index..).unwrap_or(&[])
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|line| line.contains(needle))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
