//! The scripted walkthrough: setup, connection check, then list, insert,
//! update and delete, listing the table after every change.
//!
//! A failed step is reported and the script carries on with the next one.

use crate::console::Console;
use crate::core::Result;
use std::io::{BufRead, Write};
use tracing::info;

const RULE: &str = "--------------------------------------------------";

/// Drives a [`Console`] through the demonstration sequence.
pub struct Demo<'d, W: Write, R: BufRead> {
    console: Console<'d, W>,
    input: R,
    pause: bool,
}

impl<'d, W: Write, R: BufRead> Demo<'d, W, R> {
    /// `input` is read from at each pause when `pause` is set.
    pub fn new(console: Console<'d, W>, input: R, pause: bool) -> Self {
        Demo {
            console,
            input,
            pause,
        }
    }

    /// Runs every step and returns how many of them failed.
    pub fn run(&mut self) -> Result<usize> {
        let mut failures = 0;
        let mut tally = |ok: bool| {
            if !ok {
                failures += 1;
            }
        };

        self.console.say("STUDENT MANAGEMENT SYSTEM DEMONSTRATION")?;
        self.console.say(RULE)?;

        self.heading("SETTING UP DATABASE...")?;
        tally(self.console.setup()?);

        self.heading("TESTING DATABASE CONNECTION...")?;
        tally(self.console.check()?);
        self.wait()?;

        self.heading("DISPLAYING ALL STUDENTS (Initial Data)")?;
        tally(self.console.list(None)?);
        self.wait()?;

        self.heading("ADDING A NEW STUDENT")?;
        tally(self.console.add(
            "Alice",
            "Johnson",
            "alice.johnson@example.com",
            "2023-09-03",
        )?);

        self.heading("DISPLAYING ALL STUDENTS (After Adding Alice)")?;
        tally(self.console.list(None)?);
        self.wait()?;

        self.heading("UPDATING STUDENT EMAIL")?;
        tally(self.console.update_email(1, "john.doe.updated@example.com")?);

        self.heading("DISPLAYING ALL STUDENTS (After Email Update)")?;
        tally(self.console.list(None)?);
        self.wait()?;

        self.heading("DELETING A STUDENT")?;
        tally(self.console.delete(2)?);

        self.heading("FINAL LIST OF STUDENTS")?;
        tally(self.console.list(None)?);
        self.wait()?;

        self.heading("DEMONSTRATION COMPLETED!")?;
        self.console
            .say("All CRUD operations have been successfully demonstrated.")?;

        info!(failures, "demonstration finished");
        Ok(failures)
    }

    pub fn into_console(self) -> Console<'d, W> {
        self.console
    }

    fn heading(&mut self, title: &str) -> Result<()> {
        self.console.say(&format!("\n{title}"))
    }

    fn wait(&mut self) -> Result<()> {
        if !self.pause {
            return Ok(());
        }
        self.console.say("\nPress Enter to continue.")?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }
}
