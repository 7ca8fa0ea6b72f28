use serde::Serialize;

use crate::issue::{Category, Issue};

/// Outcome of validating one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Messages in the order the checks produced them.
    pub errors: Vec<String>,
    #[serde(skip)]
    pub issues: Vec<Issue>,
}

impl ValidationResult {
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        Self {
            valid: issues.is_empty(),
            errors: issues.iter().map(ToString::to_string).collect(),
            issues,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error_count(&self) -> usize {
        self.issues.len()
    }

    /// Issue counts per category, in first-seen order.
    pub fn counts_by_category(&self) -> Vec<(Category, usize)> {
        let mut counts: Vec<(Category, usize)> = Vec::new();
        for issue in &self.issues {
            let category = issue.category();
            match counts.iter_mut().find(|(seen, _)| *seen == category) {
                Some((_, count)) => *count += 1,
                None => counts.push((category, 1)),
            }
        }
        counts
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::from_issues(Vec::new())
    }
}
