//! Operator selection of projects to remediate
//!
//! Two variants behind one seam: auto mode picks the first record only
//! (CI/non-interactive), interactive mode presents every record as a
//! numbered choice and reads a multi-selection from stdin. Cancellation
//! yields an empty selection and the run ends without error.

use crate::core::error::RemediateError;
use crate::projects::ProjectRecord;
use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Collects the subset of projects to remediate
#[async_trait]
pub trait ProjectSelector {
    /// Choose zero or more projects, in display order
    async fn select(
        &self,
        projects: &[ProjectRecord],
    ) -> Result<Vec<ProjectRecord>, RemediateError>;
}

/// Selects only the first project from the ordered list
pub struct AutoSelector;

#[async_trait]
impl ProjectSelector for AutoSelector {
    async fn select(
        &self,
        projects: &[ProjectRecord],
    ) -> Result<Vec<ProjectRecord>, RemediateError> {
        Ok(projects.iter().take(1).cloned().collect())
    }
}

/// Prompts the operator on stdin for a comma-separated multi-selection
#[derive(Default)]
pub struct InteractiveSelector;

impl InteractiveSelector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProjectSelector for InteractiveSelector {
    async fn select(
        &self,
        projects: &[ProjectRecord],
    ) -> Result<Vec<ProjectRecord>, RemediateError> {
        for (index, project) in projects.iter().enumerate() {
            println!("  {}. {}", index + 1, project.display_label());
        }

        print!("\nSelect projects to remediate (comma-separated numbers, blank to cancel): ");
        io::stdout()
            .flush()
            .await
            .map_err(|e| RemediateError::SelectionFailed {
                message: e.to_string(),
            })?;

        let mut reader = BufReader::new(io::stdin());
        let mut line = String::new();
        let bytes_read =
            reader
                .read_line(&mut line)
                .await
                .map_err(|e| RemediateError::SelectionFailed {
                    message: e.to_string(),
                })?;

        // EOF counts as cancellation
        if bytes_read == 0 {
            println!();
            return Ok(Vec::new());
        }

        let parsed = parse_selection(&line, projects.len());
        for token in &parsed.rejected {
            eprintln!("  ⚠️  Ignoring invalid selection: {}", token);
        }

        Ok(parsed
            .indices
            .iter()
            .map(|&index| projects[index].clone())
            .collect())
    }
}

/// Outcome of parsing one selection line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelection {
    /// Chosen zero-based indices, deduplicated, in display order
    pub indices: Vec<usize>,
    /// Tokens that were not a valid 1-based choice
    pub rejected: Vec<String>,
}

/// Parse a comma-separated list of 1-based choices against a list length.
///
/// A blank line or a lone `q` cancels (empty selection, nothing rejected).
pub fn parse_selection(line: &str, len: usize) -> ParsedSelection {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("q") {
        return ParsedSelection {
            indices: Vec::new(),
            rejected: Vec::new(),
        };
    }

    let mut indices = BTreeSet::new();
    let mut rejected = Vec::new();

    for token in trimmed.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token.parse::<usize>() {
            Ok(choice) if (1..=len).contains(&choice) => {
                indices.insert(choice - 1);
            }
            _ => rejected.push(token.to_string()),
        }
    }

    ParsedSelection {
        indices: indices.into_iter().collect(),
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_projects(count: usize) -> Vec<ProjectRecord> {
        (0..count)
            .map(|index| ProjectRecord {
                id: format!("p{}", index),
                name: format!("Project {}", index),
                updated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_auto_selector_takes_first() {
        let projects = sample_projects(3);
        let selected = AutoSelector.select(&projects).await.unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "p0");
    }

    #[tokio::test]
    async fn test_auto_selector_empty_input() {
        let selected = AutoSelector.select(&[]).await.unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_parse_selection_basic() {
        let parsed = parse_selection("1,3\n", 4);
        assert_eq!(parsed.indices, vec![0, 2]);
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_parse_selection_dedup_and_display_order() {
        let parsed = parse_selection("3, 1, 1", 4);
        assert_eq!(parsed.indices, vec![0, 2]);
    }

    #[test]
    fn test_parse_selection_rejects_out_of_range_and_garbage() {
        let parsed = parse_selection("0, 5, abc, 2", 3);
        assert_eq!(parsed.indices, vec![1]);
        assert_eq!(parsed.rejected, vec!["0", "5", "abc"]);
    }

    #[test]
    fn test_parse_selection_blank_cancels() {
        let parsed = parse_selection("   \n", 3);
        assert!(parsed.indices.is_empty());
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_parse_selection_q_cancels() {
        let parsed = parse_selection("Q\n", 3);
        assert!(parsed.indices.is_empty());
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_parse_selection_trailing_comma() {
        let parsed = parse_selection("1,2,\n", 3);
        assert_eq!(parsed.indices, vec![0, 1]);
        assert!(parsed.rejected.is_empty());
    }
}
