mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{prompt::PromptArgs, relay::RelaySubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jarvis",
    about = "Jarvis command layer: workbook tables, named commands, relay, folders and prompts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workbook root (default: auto-detect from .jarvis/ or .git/)
    #[arg(long, global = true, env = "JARVIS_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the workbook, its config and every built-in table
    Init,

    /// List workbook tables with row counts
    Tables,

    /// Run a named command against the local workbook
    Exec {
        /// Command label, e.g. agents.add or addProtocolEntry
        label: String,
        /// JSON payload (omit to use the command's fallback payload)
        #[arg(long)]
        data: Option<String>,
    },

    /// Run a custom command alias from the command repository
    Alias { name: String },

    /// Configure and use the remote relay
    Relay {
        #[command(subcommand)]
        subcommand: RelaySubcommand,
    },

    /// Run the plugin server
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,
        /// Open the health check in a browser
        #[arg(long)]
        open: bool,
    },

    /// Create a folder, or a preset folder tree under it
    CreateFolder {
        path: PathBuf,
        /// Preset name (mbba-logo, branding-kit-template)
        #[arg(long)]
        preset: Option<String>,
        /// Preview only
        #[arg(long)]
        dry: bool,
    },

    /// Rename a folder
    RenameFolder {
        old: PathBuf,
        new: PathBuf,
        /// Preview only
        #[arg(long)]
        dry: bool,
    },

    /// Stage everything, commit and push to origin main
    Push {
        /// Commit message (default: timestamped auto commit)
        message: Vec<String>,
    },

    /// Send a prompt to the LLM
    RunPrompt {
        #[arg(required = true)]
        text: Vec<String>,
        #[command(flatten)]
        args: PromptArgs,
    },

    /// Free text is sent to the LLM as a prompt
    #[command(external_subcommand)]
    External(Vec<String>),
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Tables => cmd::tables::run(&root, cli.json),
        Commands::Exec { label, data } => cmd::exec::run(&root, &label, data.as_deref(), cli.json),
        Commands::Alias { name } => cmd::exec::run_alias(&root, &name, cli.json),
        Commands::Relay { subcommand } => cmd::relay::run(&root, subcommand, cli.json),
        Commands::Serve { port, open } => cmd::serve::run(&root, port, open),
        Commands::CreateFolder { path, preset, dry } => {
            cmd::folder::create(&path, preset.as_deref(), dry, cli.json)
        }
        Commands::RenameFolder { old, new, dry } => cmd::folder::rename(&old, &new, dry, cli.json),
        Commands::Push { message } => cmd::push::run(&root, &message),
        Commands::RunPrompt { text, args } => cmd::prompt::run(&root, &text.join(" "), &args, cli.json),
        Commands::External(words) => cmd::prompt::run_free_text(&root, &words, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
