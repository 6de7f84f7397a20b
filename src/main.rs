use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use roster::config::{resolve_config, Config};
use roster::console::Console;
use roster::demo::Demo;
use roster::{Result, StudentDal};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Student records CRUD demonstration")]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,
    /// Database file, overriding the configuration
    #[arg(long, env = "ROSTER_DATABASE")]
    database: Option<String>,
    /// Schema SQL file, overriding the configuration
    #[arg(long)]
    schema: Option<PathBuf>,
    /// Seed data SQL file, overriding the configuration
    #[arg(long)]
    seed: Option<PathBuf>,
    /// Log at debug level; RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scripted walkthrough (default)
    Demo {
        /// Do not wait for Enter between stages
        #[arg(long)]
        no_pause: bool,
    },
    /// Create the schema and insert the initial data
    Setup,
    /// Check that the database can be reached
    Check,
    /// Print every student
    List {
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },
    /// Add a student
    Add {
        first_name: String,
        last_name: String,
        email: String,
        /// YYYY-MM-DD
        enrollment_date: String,
    },
    /// Change a student's email
    UpdateEmail { id: i64, email: String },
    /// Delete a student
    Delete { id: i64 },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListFormat {
    Table,
    Csv,
    Json,
    Markdown,
}

impl ListFormat {
    fn name(self) -> &'static str {
        match self {
            ListFormat::Table => "table",
            ListFormat::Csv => "csv",
            ListFormat::Json => "json",
            ListFormat::Markdown => "markdown",
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = if verbose == 0 { "warn" } else { "debug" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load(cli: &Cli) -> Result<Config> {
    let mut config = resolve_config(cli.config.as_deref())?;
    if let Some(database) = &cli.database {
        config.database.database = database.clone();
    }
    if let Some(schema) = &cli.schema {
        config.resources.schema = schema.clone();
    }
    if let Some(seed) = &cli.seed {
        config.resources.seed = seed.clone();
    }
    config.database.validate()?;
    Ok(config)
}

fn run(cli: Cli, dal: &StudentDal) -> Result<bool> {
    let stdout = io::stdout();
    let mut console = Console::new(dal, stdout.lock());

    match cli.command.unwrap_or(Command::Demo { no_pause: false }) {
        Command::Demo { no_pause } => {
            let mut demo = Demo::new(console, io::stdin().lock(), !no_pause);
            demo.run()?;
            Ok(true)
        }
        Command::Setup => console.setup(),
        Command::Check => console.check(),
        Command::List { format } => match format {
            ListFormat::Table => console.list(None),
            other => console.list(Some(other.name())),
        },
        Command::Add {
            first_name,
            last_name,
            email,
            enrollment_date,
        } => console.add(&first_name, &last_name, &email, &enrollment_date),
        Command::UpdateEmail { id, email } => console.update_email(id, &email),
        Command::Delete { id } => console.delete(id),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    debug!(config = ?config.database, "configuration resolved");

    let dal = StudentDal::from_config(config);
    info!(database = %dal.config().target(), "starting roster");

    match run(cli, &dal) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
