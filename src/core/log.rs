//! Append-only battle log.
//!
//! The engine never prints. Every combat operation narrates itself by
//! appending human-readable lines here; the presentation layer renders
//! them. Backed by `im::Vector` so cloning a `BattleState` snapshot does
//! not copy the whole history.

use im::Vector;
use serde::{Deserialize, Serialize};

/// Append-only log of human-readable combat lines.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BattleLog {
    lines: Vector<String>,
}

impl BattleLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// Append every line from an iterator.
    pub fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
        for line in lines {
            self.lines.push_back(line);
        }
    }

    /// Number of lines logged so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over all lines, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.lines.iter()
    }

    /// The most recent `n` lines, oldest first.
    #[must_use]
    pub fn tail(&self, n: usize) -> Vec<&String> {
        let skip = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(skip).collect()
    }

    /// Check whether any line contains the given fragment.
    ///
    /// Test convenience; rendering code should iterate instead.
    #[must_use]
    pub fn contains(&self, fragment: &str) -> bool {
        self.lines.iter().any(|l| l.contains(fragment))
    }
}
