//! Student performance reports.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ScoreRecord;

/// One student's results, as produced by [`Student::summary`](crate::model::Student::summary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: u64,
    pub name: String,
    /// Number of distinct quizzes attempted.
    pub total_attempted: usize,
    /// Latest result per quiz title.
    pub details: BTreeMap<String, ScoreRecord>,
}

impl StudentSummary {
    /// Mean percentage over the attempted quizzes that had questions.
    pub fn average_percentage(&self) -> Option<f64> {
        let percentages: Vec<f64> = self
            .details
            .values()
            .filter_map(ScoreRecord::percentage)
            .collect();
        if percentages.is_empty() {
            None
        } else {
            Some(percentages.iter().sum::<f64>() / percentages.len() as f64)
        }
    }

    /// [`average_percentage`](Self::average_percentage) as `75.00%`, or `N/A`.
    pub fn average_display(&self) -> String {
        match self.average_percentage() {
            Some(p) => format!("{p:.2}%"),
            None => "N/A".to_string(),
        }
    }
}

/// A report over every registered student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemReport {
    pub created_at: DateTime<Utc>,
    pub quiz_count: usize,
    /// Summaries in student-id order.
    pub students: Vec<StudentSummary>,
}

impl SystemReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Student Performance Report\n\n");
        md.push_str(&format!(
            "**Summary:** {} students, {} quizzes\n\n",
            self.students.len(),
            self.quiz_count
        ));

        if self.students.is_empty() {
            md.push_str("No students registered yet.\n");
            return md;
        }

        for s in &self.students {
            md.push_str(&format!("### {} (ID {})\n\n", s.name, s.id));
            if s.total_attempted == 0 {
                md.push_str("No quizzes attempted yet.\n\n");
                continue;
            }
            md.push_str("| Quiz | Score | Percentage |\n");
            md.push_str("|------|-------|------------|\n");
            for (title, record) in &s.details {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    title,
                    record,
                    record.percentage_display()
                ));
            }
            md.push_str(&format!("\n**Average:** {}\n\n", s.average_display()));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(details: &[(&str, usize, usize)]) -> StudentSummary {
        StudentSummary {
            id: 1001,
            name: "Alice".into(),
            total_attempted: details.len(),
            details: details
                .iter()
                .map(|(t, s, n)| (t.to_string(), ScoreRecord::new(*s, *n).unwrap()))
                .collect(),
        }
    }

    #[test]
    fn average_skips_empty_quizzes() {
        let s = summary(&[("A", 1, 2), ("B", 0, 0), ("C", 2, 2)]);
        assert_eq!(s.average_percentage(), Some(75.0));
        assert_eq!(summary(&[("B", 0, 0)]).average_percentage(), None);
        assert_eq!(s.average_display(), "75.00%");
        assert_eq!(summary(&[("B", 0, 0)]).average_display(), "N/A");
    }

    #[test]
    fn markdown_output() {
        let report = SystemReport {
            created_at: Utc::now(),
            quiz_count: 2,
            students: vec![summary(&[("Basic Python", 2, 3), ("Empty", 0, 0)])],
        };
        let md = report.to_markdown();
        assert!(md.contains("### Alice (ID 1001)"));
        assert!(md.contains("| Basic Python | 2/3 | 66.67% |"));
        assert!(md.contains("| Empty | 0/0 | N/A |"));
        assert!(md.contains("**Average:** 66.67%"));
    }

    #[test]
    fn json_roundtrip() {
        let report = SystemReport {
            created_at: Utc::now(),
            quiz_count: 1,
            students: vec![summary(&[("Basic Python", 2, 3)])],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        report.save_json(&path).unwrap();

        let loaded: SystemReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.students, report.students);
    }
}
