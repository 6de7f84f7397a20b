// Core infrastructure modules
pub mod config;
pub mod core;

// Student records and their console front end
pub mod console;
pub mod dal;
pub mod demo;
pub mod results_grid;
pub mod student;

#[cfg(test)]
mod test_utils;

pub use crate::config::{Config, DbConfig, ResourceConfig};
pub use crate::core::{Result, RosterError};
pub use crate::dal::StudentDal;
pub use crate::student::Student;
