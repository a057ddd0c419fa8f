//! Reported mismatches between placeholder and bind-argument counts.

use serde::{Deserialize, Serialize};

use crate::ast::Pos;
use crate::classify::Operation;

/// Direction of a placeholder/argument mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mismatch {
    /// More arguments than placeholders.
    Surplus,
    /// Fewer arguments than placeholders.
    Missing,
}

/// A placeholder/argument count mismatch at one call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub pos: Pos,
    pub operation: Operation,
    /// Placeholders found in the query text.
    pub expected: usize,
    /// Bind arguments supplied after the query.
    pub actual: usize,
    pub kind: Mismatch,
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic, or `None` when the counts agree.
    pub fn mismatch(
        file: &str,
        pos: Pos,
        operation: Operation,
        expected: usize,
        actual: usize,
    ) -> Option<Self> {
        if expected == actual {
            return None;
        }
        Some(Self {
            file: file.to_string(),
            pos,
            operation,
            expected,
            actual,
            kind: if actual > expected {
                Mismatch::Surplus
            } else {
                Mismatch::Missing
            },
            message: format!("expected {expected} args, got {actual}"),
        })
    }

    pub fn kind(&self) -> Mismatch {
        self.kind
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file, self.pos.line, self.pos.column, self.message
        )
    }
}
