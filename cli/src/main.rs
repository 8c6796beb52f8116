//! Command-line front end for the filetrack library.
//!
//! Every command prints a JSON envelope on stdout and logs to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Track one file against the bundled sample data
//! filetrack show FN-2024-004
//!
//! # Critical Planning files, evaluated one week later
//! filetrack --as-of 2026-01-29T10:00:00Z list --status critical --department Planning
//!
//! # Custom policy and dataset, as an officer
//! RUST_LOG=debug filetrack --policy policy.json --data files.yaml --role officer alerts
//! ```

mod commands;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use filetrack::{Department, Role, StatusFilter};

use crate::commands::ApiResponse;
use crate::state::{AppState, StateOptions};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Policy JSON file (defaults to the built-in policy)
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Dataset YAML file (defaults to the bundled sample)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Evaluation instant in RFC 3339 (defaults to the dataset snapshot)
    #[arg(long, global = true)]
    as_of: Option<DateTime<Utc>>,

    /// Role to log in as: admin, officer or citizen
    #[arg(long, global = true, default_value = "admin")]
    role: Role,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the tracking page for a file
    Show {
        /// File ID, e.g. FN-2024-001
        id: String,
    },
    /// List files with optional filters
    List {
        /// all, on-time, delayed or critical
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long)]
        department: Option<Department>,
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        offset: Option<u64>,
    },
    /// Show the alert feed
    Alerts,
    /// Show the officer roster with workload totals
    Officers,
    /// Show one officer
    Officer { id: String },
    /// Show the dashboard summary
    Dashboard,
    /// List the screens available to the role
    Screens,
}

fn init_logging() -> Result<()> {
    tracing_log::LogTracer::init()?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn emit<T: Serialize>(response: ApiResponse<T>) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging()?;

    let state = AppState::load(StateOptions {
        policy: cli.policy,
        data: cli.data,
        as_of: cli.as_of,
        role: cli.role,
    })?;

    tracing::debug!("Running {:?}", cli.command);
    match cli.command {
        Command::Show { id } => emit(commands::show_file(&state, &id)),
        Command::List {
            status,
            department,
            limit,
            offset,
        } => emit(commands::list_files(
            &state, status, department, limit, offset,
        )),
        Command::Alerts => emit(commands::get_alerts(&state)),
        Command::Officers => emit(commands::get_officers(&state)),
        Command::Officer { id } => emit(commands::get_officer(&state, &id)),
        Command::Dashboard => emit(commands::get_dashboard(&state)),
        Command::Screens => emit(commands::get_screens(&state)),
    }
}
