//! moplan CLI entrypoint
//! Parses command-line arguments and drives the deploy pipeline.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use moplan::config::{DeploySettings, OutputFormat};
use moplan::deploy::Orchestrator;
use moplan::render::{VariableSet, vars::load_variables};

#[derive(Parser)]
#[command(name = "moplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Render templates and commit the resulting plan to the controller
    Deploy(RunArgs),
    /// Render and dispatch templates without contacting the controller
    Check(RunArgs),
    /// List the document keys the dispatcher understands
    Classes,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Template files to render, processed in order
    #[arg(required = true)]
    templates: Vec<PathBuf>,

    /// Controller endpoint URL
    #[arg(long, default_value = "https://127.0.0.1")]
    endpoint: String,

    /// Login username
    #[arg(long, default_value = "admin")]
    username: String,

    /// Login password
    #[arg(long, env = "MOPLAN_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Variable file (YAML or JSON) fed into every template
    #[arg(long)]
    vars: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 180)]
    timeout: u64,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Render and dispatch without committing
    #[arg(long)]
    dry_run: bool,

    /// Seconds to wait before committing, Ctrl-C aborts
    #[arg(long, default_value_t = 5)]
    countdown: u64,

    /// Print the serialized plan to stdout
    #[arg(long)]
    show_output: bool,

    /// Write the serialized plan to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Disable the audit log
    #[arg(long)]
    no_audit: bool,

    /// Audit log file
    #[arg(long, default_value = "logging.json")]
    audit_file: PathBuf,

    /// Serialize the plan as XML instead of JSON
    #[arg(long)]
    xml: bool,

    /// Directory that relative output and audit paths resolve against
    #[arg(long)]
    working_dir: Option<PathBuf>,
}

impl RunArgs {
    fn settings(&self) -> DeploySettings {
        DeploySettings {
            endpoint: self.endpoint.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout_secs: self.timeout,
            verify_tls: !self.insecure,
            dry_run: self.dry_run,
            countdown_secs: self.countdown,
            show_output: self.show_output,
            output_file: self.output.clone(),
            audit_log: !self.no_audit,
            audit_file: self.audit_file.clone(),
            format: if self.xml {
                OutputFormat::Xml
            } else {
                OutputFormat::Json
            },
            working_dir: self.working_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Deploy(args) => run(args, false).await,
        Commands::Check(args) => run(args, true).await,
        Commands::Classes => {
            for key in moplan::dispatch::handlers::supported_keys() {
                println!("{key}");
            }
            Ok(())
        }
    }
}

async fn run(args: RunArgs, check_only: bool) -> anyhow::Result<()> {
    let variables = match &args.vars {
        Some(path) => load_variables(path)
            .with_context(|| format!("cannot load variables from {}", path.display()))?,
        None => VariableSet::new(),
    };

    let orchestrator = Orchestrator::new(args.settings());
    let records = if check_only {
        orchestrator.check(&args.templates, &variables).await
    } else {
        orchestrator.deploy(&args.templates, &variables).await
    };

    let failed = records.iter().filter(|record| !record.success).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} template(s) failed", records.len());
    }
    info!("{} template(s) processed successfully", records.len());
    Ok(())
}
