//! Console reporting for DAL operations.
//!
//! Each method runs one DAL operation, writes a human-readable status line
//! (or table) and returns whether the operation succeeded. Failures are
//! reported, never propagated: only a failed write to the output is an `Err`.

use crate::core::{Result, RosterError};
use crate::dal::StudentDal;
use crate::results_grid::ResultsGrid;
use std::io::Write;

pub struct Console<'d, W: Write> {
    dal: &'d StudentDal,
    out: W,
}

impl<'d, W: Write> Console<'d, W> {
    pub fn new(dal: &'d StudentDal, out: W) -> Self {
        Console { dal, out }
    }

    /// Writes a free-form line.
    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn setup(&mut self) -> Result<bool> {
        match self.dal.bootstrap_schema() {
            Ok(()) => {
                self.say("Database schema created successfully.")?;
                self.say("Initial data inserted successfully.")?;
                Ok(true)
            }
            Err(err) => self.fail("Error setting up database", &err),
        }
    }

    pub fn check(&mut self) -> Result<bool> {
        if self.dal.check_connectivity() {
            self.say("SUCCESSFUL DATABASE CONNECTION")?;
            Ok(true)
        } else {
            self.say(&format!(
                "ERROR connecting to database '{}'.",
                self.dal.config().target()
            ))?;
            self.say("Please check your database configuration.")?;
            Ok(false)
        }
    }

    /// Prints every student as a table, or exported in `format`.
    pub fn list(&mut self, format: Option<&str>) -> Result<bool> {
        let students = match self.dal.list_all() {
            Ok(students) => students,
            Err(err) => return self.fail("Error retrieving students", &err),
        };

        let grid = ResultsGrid::new(&students);
        match format {
            None | Some("table") => write!(self.out, "{}", grid.render())?,
            Some(format) => match grid.export(format) {
                Ok(exported) => writeln!(self.out, "{}", exported.trim_end())?,
                Err(err) => return self.fail("Error exporting students", &err),
            },
        }
        Ok(true)
    }

    pub fn add(&mut self, first: &str, last: &str, email: &str, date: &str) -> Result<bool> {
        match self.dal.insert(first, last, email, date) {
            Ok(()) => {
                self.say("Student added successfully.")?;
                Ok(true)
            }
            Err(err) => self.fail("Error adding student", &err),
        }
    }

    pub fn update_email(&mut self, id: i64, email: &str) -> Result<bool> {
        match self.dal.update_email(id, email) {
            Ok(student) => {
                self.say(&format!(
                    "Email updated successfully for {} (ID: {}).",
                    student.full_name(),
                    student.student_id
                ))?;
                Ok(true)
            }
            Err(err) => self.fail("Error updating email", &err),
        }
    }

    pub fn delete(&mut self, id: i64) -> Result<bool> {
        match self.dal.delete(id) {
            Ok(student) => {
                self.say(&format!(
                    "Student {} (ID: {}) deleted successfully.",
                    student.full_name(),
                    student.student_id
                ))?;
                Ok(true)
            }
            Err(err) => self.fail("Error deleting student", &err),
        }
    }

    fn fail(&mut self, context: &str, err: &RosterError) -> Result<bool> {
        let message = describe_failure(context, err);
        self.say(&message)?;
        Ok(false)
    }
}

/// The console wording for a failed operation.
pub fn describe_failure(context: &str, err: &RosterError) -> String {
    match err {
        RosterError::Connection { .. } => format!(
            "ERROR connecting to database: {err}\nPlease check your database configuration."
        ),
        RosterError::Validation(message) => message.clone(),
        RosterError::DuplicateEmail(_) | RosterError::NotFound(_) => format!("Error: {err}."),
        _ => format!("{context}: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::DatabaseFixture;

    fn output(console: Console<'_, Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn test_list_prints_table() {
        let fixture = DatabaseFixture::seeded();
        let mut console = Console::new(fixture.dal(), Vec::new());

        assert!(console.list(None).unwrap());
        let text = output(console);
        assert!(text.contains("jane.smith@example.com"));
        assert!(text.ends_with("Total students: 3\n"));
    }

    #[test]
    fn test_list_empty_table() {
        let fixture = DatabaseFixture::empty();
        let mut console = Console::new(fixture.dal(), Vec::new());

        assert!(console.list(None).unwrap());
        assert_eq!(output(console), "No students found in the database.\n");
    }

    #[test]
    fn test_list_unknown_format_fails() {
        let fixture = DatabaseFixture::seeded();
        let mut console = Console::new(fixture.dal(), Vec::new());

        assert!(!console.list(Some("xml")).unwrap());
        assert!(output(console).contains("Unsupported export format"));
    }

    #[test]
    fn test_failures_are_reported_not_raised() {
        let fixture = DatabaseFixture::seeded();
        let mut console = Console::new(fixture.dal(), Vec::new());

        assert!(!console.add("Jane", "Smith", "jane.smith@example.com", "2023-09-01").unwrap());
        assert!(!console.update_email(42, "x@example.com").unwrap());
        assert!(!console.add("", "", "", "").unwrap());

        let text = output(console);
        assert!(text.contains("Error: Email 'jane.smith@example.com' already exists in the database."));
        assert!(text.contains("Error: Student with ID 42 not found."));
        assert!(text.contains("All fields are required."));
    }

    #[test]
    fn test_delete_names_the_student() {
        let fixture = DatabaseFixture::seeded();
        let mut console = Console::new(fixture.dal(), Vec::new());

        assert!(console.delete(2).unwrap());
        assert_eq!(
            output(console),
            "Student Jane Smith (ID: 2) deleted successfully.\n"
        );
    }

    #[test]
    fn test_describe_connection_failure() {
        let err = RosterError::Connection {
            target: "students.db".to_string(),
            source: rusqlite::Error::InvalidQuery,
        };
        let message = describe_failure("Error adding student", &err);
        assert!(message.starts_with("ERROR connecting to database"));
        assert!(message.ends_with("Please check your database configuration."));
    }
}
