/// Student Data Access Layer
///
/// The named operations of the roster, built on [`Session`] and the
/// fetch/mutate execution contract. Each operation opens its own session and
/// releases it before returning; nothing is shared between calls.

use crate::config::{Config, DbConfig, ResourceConfig};
use crate::core::db::connection::{acquire, Session};
use crate::core::db::schema;
use crate::core::{Result, RosterError};
use crate::student::{parse_date, Student};
use tracing::{debug, info, warn};

const SELECT_ALL: &str = "SELECT student_id, first_name, last_name, email, enrollment_date \
     FROM students ORDER BY student_id";

const SELECT_BY_ID: &str = "SELECT student_id, first_name, last_name, email, enrollment_date \
     FROM students WHERE student_id = ?1";

const INSERT: &str =
    "INSERT INTO students (first_name, last_name, email, enrollment_date) VALUES (?1, ?2, ?3, ?4)";

const UPDATE_EMAIL: &str = "UPDATE students SET email = ?1 WHERE student_id = ?2";

const DELETE: &str = "DELETE FROM students WHERE student_id = ?1";

/// Data access for the `students` table.
#[derive(Debug, Clone)]
pub struct StudentDal {
    config: DbConfig,
    resources: ResourceConfig,
}

impl StudentDal {
    /// Creates a DAL using the default schema and seed locations.
    pub fn new(config: DbConfig) -> Self {
        Self::with_resources(config, ResourceConfig::default())
    }

    pub fn with_resources(config: DbConfig, resources: ResourceConfig) -> Self {
        StudentDal { config, resources }
    }

    pub fn from_config(config: Config) -> Self {
        Self::with_resources(config.database, config.resources)
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn resources(&self) -> &ResourceConfig {
        &self.resources
    }

    /// Creates the schema and loads the seed rows.
    ///
    /// Not idempotent: a second run fails on the seed's unique emails.
    pub fn bootstrap_schema(&self) -> Result<()> {
        schema::bootstrap_schema(&self.config, &self.resources.schema, &self.resources.seed)
    }

    /// Opens and immediately releases a session.
    pub fn check_connectivity(&self) -> bool {
        match acquire(&self.config).and_then(|mut session| session.close()) {
            Ok(()) => {
                info!(database = %self.config.target(), "connectivity check passed");
                true
            }
            Err(err) => {
                warn!(database = %self.config.target(), error = %err, "connectivity check failed");
                false
            }
        }
    }

    /// Every student, ordered by ascending id. An empty table is not an error.
    pub fn list_all(&self) -> Result<Vec<Student>> {
        let session = acquire(&self.config)?;
        let result = session.fetch(SELECT_ALL, &[])?;
        result
            .rows
            .iter()
            .map(|row| Student::from_row(row))
            .collect()
    }

    /// Inserts a new student. The generated id is not returned.
    ///
    /// # Errors
    ///
    /// - `Validation` if any field is blank or the date is not `YYYY-MM-DD`;
    ///   the database is not touched.
    /// - `DuplicateEmail` if `email` is already taken.
    pub fn insert(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        enrollment_date: &str,
    ) -> Result<()> {
        let required = [first_name, last_name, email, enrollment_date];
        if required.iter().any(|field| field.is_empty()) {
            return Err(RosterError::Validation("All fields are required.".to_string()));
        }
        let date = parse_date(enrollment_date).map_err(|_| {
            RosterError::Validation(format!(
                "Enrollment date '{enrollment_date}' must be formatted as YYYY-MM-DD."
            ))
        })?;

        let session = acquire(&self.config)?;
        let affected = session
            .mutate(INSERT, &[&first_name, &last_name, &email, &date])
            .map_err(|err| duplicate_email(err, email))?;

        if affected == 0 {
            return Err(RosterError::NoRowsAffected);
        }
        debug!(email, "student inserted");
        Ok(())
    }

    /// Replaces the email of student `id` and returns the updated record.
    ///
    /// # Errors
    ///
    /// - `Validation` if `new_email` is blank.
    /// - `NotFound` if no student has `id`; nothing is written.
    /// - `DuplicateEmail` if another student already uses `new_email`.
    pub fn update_email(&self, id: i64, new_email: &str) -> Result<Student> {
        if new_email.is_empty() {
            return Err(RosterError::Validation("Email cannot be empty.".to_string()));
        }

        let session = acquire(&self.config)?;
        let mut student = find_by_id(&session, id)?.ok_or(RosterError::NotFound(id))?;

        let affected = session
            .mutate(UPDATE_EMAIL, &[&new_email, &id])
            .map_err(|err| duplicate_email(err, new_email))?;
        if affected == 0 {
            return Err(RosterError::NotFound(id));
        }

        debug!(id, email = new_email, "student email updated");
        student.email = new_email.to_string();
        Ok(student)
    }

    /// Deletes student `id` and returns the record as it was.
    ///
    /// # Errors
    ///
    /// `NotFound` if no student has `id`, including one deleted earlier.
    pub fn delete(&self, id: i64) -> Result<Student> {
        let session = acquire(&self.config)?;
        let student = find_by_id(&session, id)?.ok_or(RosterError::NotFound(id))?;

        if session.mutate(DELETE, &[&id])? == 0 {
            return Err(RosterError::NotFound(id));
        }

        debug!(id, "student deleted");
        Ok(student)
    }
}

fn find_by_id(session: &Session, id: i64) -> Result<Option<Student>> {
    let result = session.fetch(SELECT_BY_ID, &[&id])?;
    result.rows.first().map(|row| Student::from_row(row)).transpose()
}

/// Narrows a unique violation on write to the email that caused it.
fn duplicate_email(err: RosterError, email: &str) -> RosterError {
    if err.is_unique_violation() {
        RosterError::DuplicateEmail(email.to_string())
    } else {
        err
    }
}
