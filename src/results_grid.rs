//! Results Grid Module
//!
//! Renders student records for the console: a fixed-width table for people
//! and CSV/JSON/Markdown exports for other programs.

use crate::core::{Result, RosterError};
use crate::student::{Student, DATE_FORMAT};

/// Column headers and their display widths.
const COLUMNS: [(&str, usize); 5] = [
    ("ID", 5),
    ("First Name", 15),
    ("Last Name", 15),
    ("Email", 35),
    ("Enrollment Date", 15),
];

const RULE_WIDTH: usize = 90;

/// Printed in place of a table when there are no rows.
pub const EMPTY_MESSAGE: &str = "No students found in the database.";

/// Output formats accepted by [`ResultsGrid::export`].
pub const EXPORT_FORMATS: [&str; 3] = ["csv", "json", "markdown"];

/// A rendered view over a list of students.
#[derive(Debug, Clone)]
pub struct ResultsGrid<'a> {
    students: &'a [Student],
}

impl<'a> ResultsGrid<'a> {
    pub fn new(students: &'a [Student]) -> Self {
        ResultsGrid { students }
    }

    fn headers() -> impl Iterator<Item = &'static str> {
        COLUMNS.iter().map(|(name, _)| *name)
    }

    fn cells(student: &Student) -> [String; 5] {
        [
            student.student_id.to_string(),
            student.first_name.clone(),
            student.last_name.clone(),
            student.email.clone(),
            student.enrollment_date.format(DATE_FORMAT).to_string(),
        ]
    }

    fn aligned(cells: &[String]) -> String {
        cells
            .iter()
            .zip(COLUMNS.iter())
            .map(|(cell, (_, width))| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders the fixed-width table, ending with the total count.
    pub fn render(&self) -> String {
        if self.students.is_empty() {
            return format!("{EMPTY_MESSAGE}\n");
        }

        let headers: Vec<String> = Self::headers().map(String::from).collect();
        let mut output = Self::aligned(&headers);
        output.push('\n');
        output.push_str(&"-".repeat(RULE_WIDTH));
        output.push('\n');
        for student in self.students {
            output.push_str(&Self::aligned(&Self::cells(student)));
            output.push('\n');
        }
        output.push_str(&format!("\nTotal students: {}\n", self.students.len()));
        output
    }

    /// Exports the grid data to a specified format.
    /// Supported formats: CSV, JSON, Markdown.
    pub fn export(&self, format: &str) -> Result<String> {
        match format.to_lowercase().as_str() {
            "csv" => Ok(self.export_to_csv()),
            "json" => self.export_to_json(),
            "markdown" => Ok(self.export_to_markdown()),
            _ => Err(RosterError::Ui(format!(
                "Unsupported export format: '{}'. Supported formats: {}",
                format,
                EXPORT_FORMATS.join(", ")
            ))),
        }
    }

    fn export_to_csv(&self) -> String {
        let mut output = Self::headers().collect::<Vec<_>>().join(",");
        output.push('\n');
        for student in self.students {
            let row: Vec<String> = Self::cells(student).iter().map(|c| csv_field(c)).collect();
            output.push_str(&row.join(","));
            output.push('\n');
        }
        output
    }

    fn export_to_json(&self) -> Result<String> {
        serde_json::to_string(self.students).map_err(RosterError::Json)
    }

    fn export_to_markdown(&self) -> String {
        let headers: Vec<&str> = Self::headers().collect();
        let mut output = format!("| {} |\n", headers.join(" | "));
        let underline: Vec<String> = headers.iter().map(|h| "-".repeat(h.len())).collect();
        output.push_str(&format!("| {} |\n", underline.join(" | ")));
        for student in self.students {
            output.push_str(&format!("| {} |\n", Self::cells(student).join(" | ")));
        }
        output
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use insta::assert_snapshot;

    fn students() -> Vec<Student> {
        vec![
            Student {
                student_id: 1,
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: "john.doe@example.com".to_string(),
                enrollment_date: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
            },
            Student {
                student_id: 4,
                first_name: "Alice".to_string(),
                last_name: "Johnson".to_string(),
                email: "alice.johnson@example.com".to_string(),
                enrollment_date: NaiveDate::from_ymd_opt(2023, 9, 3).unwrap(),
            },
        ]
    }

    #[test]
    fn test_render_empty_grid() {
        let grid = ResultsGrid::new(&[]);
        assert_eq!(grid.render(), "No students found in the database.\n");
    }

    #[test]
    fn test_render_table() {
        let students = students();
        let rendered = ResultsGrid::new(&students).render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[1], "-".repeat(90));
        assert!(lines[2].starts_with("1     John            Doe             john.doe@example.com"));
        assert!(lines[3].ends_with("2023-09-03     "));
        assert_eq!(lines.last(), Some(&"Total students: 2"));
    }

    #[test]
    fn test_render_header_snapshot() {
        let students = students();
        let rendered = ResultsGrid::new(&students).render();
        let header = rendered.lines().next().unwrap().trim_end();
        assert_snapshot!(header, @"ID    First Name      Last Name       Email                               Enrollment Date");
    }

    #[test]
    fn test_export_to_csv() {
        let mut students = students();
        students[0].last_name = "Doe, Jr.".to_string();
        let csv = ResultsGrid::new(&students).export("csv").unwrap();

        assert_eq!(
            csv,
            "ID,First Name,Last Name,Email,Enrollment Date\n\
             1,John,\"Doe, Jr.\",john.doe@example.com,2023-09-01\n\
             4,Alice,Johnson,alice.johnson@example.com,2023-09-03\n"
        );
    }

    #[test]
    fn test_csv_quotes_carriage_returns() {
        let mut students = students();
        students[1].first_name = "Al\rice".to_string();
        let csv = ResultsGrid::new(&students).export("csv").unwrap();

        assert!(csv.contains("4,\"Al\rice\",Johnson,"), "{csv:?}");
    }

    #[test]
    fn test_export_to_json() {
        let students = students();
        let json = ResultsGrid::new(&students).export("JSON").unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[1]["student_id"], 4);
        assert_eq!(parsed[1]["enrollment_date"], "2023-09-03");
    }

    #[test]
    fn test_export_to_markdown() {
        let students = students();
        let markdown = ResultsGrid::new(&students[..1]).export("markdown").unwrap();
        let lines: Vec<&str> = markdown.lines().collect();

        assert_eq!(lines[0], "| ID | First Name | Last Name | Email | Enrollment Date |");
        assert_eq!(lines[1], "| -- | ---------- | --------- | ----- | --------------- |");
        assert_eq!(lines[2], "| 1 | John | Doe | john.doe@example.com | 2023-09-01 |");
    }

    #[test]
    fn test_export_unsupported_format() {
        let result = ResultsGrid::new(&[]).export("xml");

        if let Err(RosterError::Ui(msg)) = result {
            assert!(msg.contains("Unsupported export format"));
            assert!(msg.contains("xml"));
        } else {
            panic!("Expected UI error");
        }
    }
}
