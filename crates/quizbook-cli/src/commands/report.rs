//! The `quizbook report` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizbook_core::report::SystemReport;

use crate::Settings;

pub fn execute(settings: &Settings, format: String, output: Option<PathBuf>) -> Result<()> {
    let system = super::open_system(settings)?;
    let report = system.report();

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        "text" => println!("{}", render_text(&report)),
        "table" => {
            println!(
                "Report generated {} ({} quizzes)",
                report.created_at.format("%Y-%m-%d %H:%M UTC"),
                report.quiz_count
            );
            println!("{}", render_table(&report));
        }
        other => anyhow::bail!("unknown format: {other} (expected table, text, json or markdown)"),
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

/// The banner-style report printed by the interactive menu.
pub fn render_text(report: &SystemReport) -> String {
    let rule = "=".repeat(40);
    let mut out = format!("\n{rule}\n           STUDENT PERFORMANCE REPORT\n{rule}\n");

    if report.students.is_empty() {
        out.push_str("No students registered yet.\n");
        return out;
    }

    for s in &report.students {
        out.push_str(&format!(
            "\n--- Student ID: {} | Name: {} ---\n",
            s.id, s.name
        ));

        if s.total_attempted == 0 {
            out.push_str("   -> No quizzes attempted yet.\n");
            continue;
        }

        out.push_str(&format!("   Quizzes Attempted: {}\n", s.total_attempted));
        out.push_str("   Details:\n");
        for (title, record) in &s.details {
            out.push_str(&format!(
                "     - {}: {} ({})\n",
                title,
                record,
                record.percentage_display()
            ));
        }
        out.push_str(&format!("   Average: {}\n", s.average_display()));
    }
    out.push_str(&format!("\n{rule}\n"));
    out
}

pub fn render_table(report: &SystemReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Quiz", "Score", "Percentage", "Average"]);

    for s in &report.students {
        let average = s.average_display();
        if s.details.is_empty() {
            table.add_row(vec![
                Cell::new(s.id),
                Cell::new(&s.name),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
            ]);
            continue;
        }
        for (title, record) in &s.details {
            table.add_row(vec![
                Cell::new(s.id),
                Cell::new(&s.name),
                Cell::new(title),
                Cell::new(record),
                Cell::new(record.percentage_display()),
                Cell::new(&average),
            ]);
        }
    }

    table
}
