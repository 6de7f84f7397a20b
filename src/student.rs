//! Student record model and row decoding.

use crate::core::db::query::format_value;
use crate::core::{Result, RosterError};
use chrono::NaiveDate;
use rusqlite::types::Value;
use serde::Serialize;

/// Storage format of `enrollment_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the `students` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub enrollment_date: NaiveDate,
}

impl Student {
    /// Decodes `student_id, first_name, last_name, email, enrollment_date`.
    pub fn from_row(row: &[Value]) -> Result<Self> {
        match row {
            [id, first, last, email, date] => Ok(Student {
                student_id: integer(id, "student_id")?,
                first_name: text(first, "first_name")?,
                last_name: text(last, "last_name")?,
                email: text(email, "email")?,
                enrollment_date: parse_date(&text(date, "enrollment_date")?)
                    .map_err(|e| RosterError::Decode(format!("enrollment_date: {e}")))?,
            }),
            _ => Err(RosterError::Decode(format!(
                "expected 5 columns, got {}",
                row.len()
            ))),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
}

fn integer(value: &Value, column: &str) -> Result<i64> {
    match value {
        Value::Integer(i) => Ok(*i),
        other => Err(RosterError::Decode(format!(
            "{column}: expected integer, got {}",
            format_value(other)
        ))),
    }
}

fn text(value: &Value, column: &str) -> Result<String> {
    match value {
        Value::Text(s) => Ok(s.clone()),
        other => Err(RosterError::Decode(format!(
            "{column}: expected text, got {}",
            format_value(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: Value, date: &str) -> Vec<Value> {
        vec![
            id,
            Value::Text("Alice".into()),
            Value::Text("Johnson".into()),
            Value::Text("alice.johnson@example.com".into()),
            Value::Text(date.into()),
        ]
    }

    #[test]
    fn test_decode_row() {
        let student = Student::from_row(&row(Value::Integer(4), "2023-09-03")).unwrap();
        assert_eq!(student.student_id, 4);
        assert_eq!(student.full_name(), "Alice Johnson");
        assert_eq!(
            student.enrollment_date,
            NaiveDate::from_ymd_opt(2023, 9, 3).unwrap()
        );
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let err = Student::from_row(&[Value::Integer(1)]).unwrap_err();
        assert!(err.to_string().contains("expected 5 columns"));

        let err = Student::from_row(&row(Value::Null, "2023-09-03")).unwrap_err();
        assert!(err.to_string().contains("student_id: expected integer, got NULL"));
    }

    #[test]
    fn test_decode_rejects_bad_date() {
        let err = Student::from_row(&row(Value::Integer(1), "09/03/2023")).unwrap_err();
        assert!(matches!(err, RosterError::Decode(_)));
    }

    #[test]
    fn test_serializes_date_as_iso() {
        let student = Student::from_row(&row(Value::Integer(1), "2023-09-03")).unwrap();
        let json = serde_json::to_string(&student).unwrap();
        assert!(json.contains(r#""enrollment_date":"2023-09-03""#));
    }
}
