mod config;
mod goal_cmds;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use goalie_core::model::{GeminiModel, GenerativeModel};
use goalie_db::config::DbConfig;
use goalie_db::pool;

use config::GoalieConfig;

#[derive(Parser)]
#[command(name = "goalie", about = "AI-planned goals broken into dated tasks")]
struct Cli {
    /// Database URL (overrides GOALIE_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a goalie config file (no database required)
    Init {
        /// SQLite connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Gemini model name
        #[arg(long, default_value = goalie_core::model::gemini::DEFAULT_MODEL)]
        model: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the goalie database (requires config file or env vars)
    DbInit,
    /// Run the HTTP API server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Gemini model name (overrides GOALIE_MODEL env var)
        #[arg(long)]
        model: Option<String>,
    },
    /// Generate and validate a plan for a goal without storing it
    Plan {
        /// Goal text, e.g. "Learn Spanish in 3 months"
        goal: String,
        /// First day of the plan (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Gemini model name (overrides GOALIE_MODEL env var)
        #[arg(long)]
        model: Option<String>,
    },
    /// Goal management
    Goals {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Flip a task between completed and not completed
    Toggle {
        /// Task ID to toggle
        task_id: i64,
    },
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// List all goals, newest first
    List,
    /// Show a goal with its tasks grouped by phase
    Show {
        /// Goal ID to show
        goal_id: i64,
    },
    /// Delete a goal and all of its tasks
    Delete {
        /// Goal ID to delete
        goal_id: i64,
    },
}

/// Execute the `goalie init` command: write config file.
fn cmd_init(db_url: &str, model: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        model: config::ModelSection {
            name: model.to_string(),
            api_key: None,
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  model.name   = {model}");
    println!();
    println!("Set {} before running `goalie serve` or `goalie plan`.", config::API_KEY_ENV);
    println!("Next: run `goalie db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `goalie db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = GoalieConfig::resolve(cli_db_url, None)?;

    println!("Initializing goalie database...");
    println!("  {}", describe_database(&resolved.db_config));

    // Connecting creates the SQLite file if it does not exist.
    let db_pool = pool::create_pool(&resolved.db_config).await?;

    let result = async {
        pool::run_migrations(&db_pool).await?;
        pool::table_counts(&db_pool).await
    }
    .await;
    db_pool.close().await;
    let counts = result?;

    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    println!("goalie db-init complete.");
    Ok(())
}

/// Where the database lives, for status output.
fn describe_database(db_config: &DbConfig) -> String {
    match db_config.database_path() {
        Some(path) => format!("Database file: {path}"),
        None if db_config.is_in_memory() => "Database: in-memory (discarded on exit)".to_string(),
        None => format!("Database URL: {}", db_config.database_url),
    }
}

/// Build the Gemini client from resolved config.
fn build_model(resolved: &GoalieConfig) -> anyhow::Result<Arc<dyn GenerativeModel>> {
    let model = GeminiModel::new(resolved.gemini_config()?)
        .context("failed to initialize Gemini client")?;
    Ok(Arc::new(model))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, model, force } => {
            cmd_init(&db_url, &model, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Serve { bind, port, model } => {
            let resolved = GoalieConfig::resolve(cli.database_url.as_deref(), model.as_deref())?;
            let model = build_model(&resolved)?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = async {
                pool::run_migrations(&db_pool).await?;
                let state = serve_cmd::AppState {
                    pool: db_pool.clone(),
                    model,
                };
                serve_cmd::run_serve(state, &bind, port).await
            }
            .await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan { goal, start, model } => {
            let resolved = GoalieConfig::resolve(cli.database_url.as_deref(), model.as_deref())?;
            let model = build_model(&resolved)?;
            let start = start.unwrap_or_else(|| Local::now().date_naive());
            goal_cmds::run_plan_dry_run(model.as_ref(), &goal, start).await?;
        }
        Commands::Goals { command } => {
            let resolved = GoalieConfig::resolve(cli.database_url.as_deref(), None)?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = goal_cmds::run_goal_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Toggle { task_id } => {
            let resolved = GoalieConfig::resolve(cli.database_url.as_deref(), None)?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = goal_cmds::run_toggle(&db_pool, task_id).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_database_names_the_file() {
        let cfg = DbConfig::new("sqlite:///var/lib/goalie/data.db?mode=rwc");
        assert_eq!(describe_database(&cfg), "Database file: /var/lib/goalie/data.db");
    }

    #[test]
    fn describe_database_in_memory() {
        let cfg = DbConfig::new(DbConfig::MEMORY_URL);
        assert!(describe_database(&cfg).contains("in-memory"));
    }

    #[test]
    fn describe_database_falls_back_to_url() {
        let cfg = DbConfig::new("sqlite://");
        assert_eq!(describe_database(&cfg), "Database URL: sqlite://");
    }
}
