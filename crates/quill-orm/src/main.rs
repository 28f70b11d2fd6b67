//! quill CLI
//!
//! Provisions the tables of the bundled sample models.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use quill_core::Model;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use quill_orm::{Database, DatabaseSettings, Registry, DEFAULT_HOST, DEFAULT_PORT};

/// A background job.
#[allow(dead_code)]
#[derive(Debug, Model)]
struct Job {
    id: Option<i64>,
    data: String,
    #[field(text)]
    body: Option<String>,
    count: Option<i32>,
    tries: Option<f64>,
    #[field(default = true)]
    is_active: bool,
    date_created: Option<DateTime<Utc>>,
}

/// A message, optionally attached to a job.
#[allow(dead_code)]
#[derive(Debug, Model)]
struct Message {
    id: Option<i64>,
    content: String,
    #[field(max_length = 120)]
    body: Option<String>,
    count: Option<i32>,
    #[field(default = 0.0)]
    tries: f64,
    #[field(default = true)]
    is_active: bool,
    date_created: Option<DateTime<Utc>>,
    #[field(foreign_key = Job, on_delete = "SET NULL")]
    job: Option<i64>,
}

/// Table provisioning for quill models.
#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// JSON settings file, keyed like the environment variables.
    /// Takes precedence over the other connection flags.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Database name.
    #[arg(long = "db-name", env = "DB_NAME")]
    name: Option<String>,

    /// Role to connect as.
    #[arg(long = "db-user", env = "DB_USER")]
    user: Option<String>,

    /// Password.
    #[arg(long = "db-pass", env = "DB_PASS", default_value = "", hide_env_values = true)]
    password: String,

    /// Server host.
    #[arg(long = "db-host", env = "DB_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Server port.
    #[arg(long = "db-port", env = "DB_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

impl ConnectionArgs {
    fn to_settings(&self) -> anyhow::Result<DatabaseSettings> {
        if let Some(path) = &self.settings {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return Ok(DatabaseSettings::from_json(&json)?);
        }
        let name = self.name.clone().context("DB_NAME is not set")?;
        let user = self.user.clone().context("DB_USER is not set")?;
        Ok(DatabaseSettings::new(name, user)
            .password(self.password.clone())
            .host(self.host.clone())
            .port(self.port))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create the sample tables if they do not exist.
    CreateTables,

    /// Drop the sample tables.
    DropTables,

    /// Print the CREATE TABLE statements without connecting.
    Sql,

    /// List the tables of the public schema.
    Tables,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if matches!(cli.command, Commands::Sql) {
        println!("{}", Job::create_table_sql());
        println!("{}", Message::create_table_sql());
        return Ok(());
    }

    let settings = cli.connection.to_settings()?;
    let db = Database::connect(&settings).await?;
    let registry = Registry::new(db.clone())
        .register::<Job>()
        .register::<Message>();

    match cli.command {
        Commands::CreateTables => {
            registry.create_tables().await?;
            info!("Tables created.");
        }

        Commands::DropTables => {
            registry.drop_tables().await?;
            info!("Tables dropped.");
        }

        Commands::Tables => {
            let tables = db.tables().await?;
            if tables.is_empty() {
                info!("No tables in the public schema.");
            }
            for table in tables {
                println!("{table}");
            }
        }

        Commands::Sql => {}
    }

    db.close().await;
    Ok(())
}
