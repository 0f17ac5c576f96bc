mod cmd;
mod context;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use cmd::{
    analyze::AnalyzeArgs, audit::AuditArgs, chat::ChatArgs, diagnose::DiagnoseArgs,
    execute::ExecuteArgs, generate::GenerateArgs, modify::ModifyArgs, suggest::SuggestArgs,
};
use kube_ai_core::config::{self, Settings};
use std::path::{Path, PathBuf};

use crate::context::Context;

#[derive(Parser)]
#[command(
    name = "kube-ai",
    about = "AI-powered Kubernetes helper: analyze, audit, generate and patch manifests",
    version,
    propagate_version = true
)]
struct Cli {
    /// Chat model to use for AI commands
    #[arg(long, global = true, env = config::ENV_MODEL)]
    model: Option<String>,

    /// Maximum tokens in each model answer
    #[arg(long, global = true, env = config::ENV_MAX_TOKENS)]
    max_tokens: Option<u32>,

    /// Command history file (default: ~/.kube-ai-history)
    #[arg(long, global = true, env = config::ENV_HISTORY)]
    history_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a manifest, kubectl output or live resource and answer a question about it
    Analyze(AnalyzeArgs),

    /// Audit a manifest or live resource for security risks and misconfigurations
    Audit(AuditArgs),

    /// Diagnose a failing pod from kubectl describe output or a file
    Diagnose(DiagnoseArgs),

    /// Generate a Kubernetes manifest from a natural-language description
    Generate(GenerateArgs),

    /// Patch namespace, name or replicas in every document of a YAML file
    Modify(ModifyArgs),

    /// Apply a manifest to the cluster with kubectl
    Execute(ExecuteArgs),

    /// Ask a free-form Kubernetes question
    Chat(ChatArgs),

    /// Suggest kubectl commands for a question or a manifest
    Suggest(SuggestArgs),

    /// Show the command history
    History,

    /// Show the Kube-AI version
    Version,

    /// Generate a shell completion script
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let dotenv = config::load_dotenv(Path::new(".env"));

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &dotenv {
        Ok(true) => tracing::debug!("loaded variables from .env"),
        Ok(false) => tracing::debug!("no .env file in the working directory"),
        Err(e) => tracing::warn!(error = %e, "ignoring unusable .env file"),
    }

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::from_env()?;
    if let Some(model) = cli.model {
        settings.model = model;
    }
    if let Some(max_tokens) = cli.max_tokens {
        settings.max_tokens = max_tokens;
    }
    if let Some(path) = cli.history_file {
        settings.history_path = Some(path);
    }
    tracing::debug!(model = %settings.model, base_url = %settings.base_url, "resolved settings");

    let ctx = Context::new(settings, cli.json);

    match cli.command {
        Commands::Analyze(args) => cmd::analyze::run(&ctx, args),
        Commands::Audit(args) => cmd::audit::run(&ctx, args),
        Commands::Diagnose(args) => cmd::diagnose::run(&ctx, args),
        Commands::Generate(args) => cmd::generate::run(&ctx, args),
        Commands::Modify(args) => cmd::modify::run(&ctx, args),
        Commands::Execute(args) => cmd::execute::run(&ctx, args),
        Commands::Chat(args) => cmd::chat::run(&ctx, args),
        Commands::Suggest(args) => cmd::suggest::run(&ctx, args),
        Commands::History => cmd::history::run(&ctx),
        Commands::Version => cmd::version::run(&ctx),
        Commands::Completion { shell } => cmd::completion::run(shell, Cli::command()),
    }
}
