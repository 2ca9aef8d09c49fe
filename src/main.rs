use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod commands;

const LONG_ABOUT: &str = "\
Captures what happens during an AI-assisted coding session so a learning step can 
pick up the user's preferences and corrections later.

The host runs 'session-start' once, then 'pre-tool' and 'post-tool' around every 
action. Each session gets its own directory under .projspec/sessions/ with two 
append-only JSON Lines streams: tools.jsonl (pre/post events, linked by id) and 
corrections.jsonl (feedback classified into a small taxonomy).

Capture never gets in the way: the hook commands always exit 0, and when no 
session is active they do nothing. Stdin is only read with --payload-stdin.";

const AFTER_HELP: &str = "\
EXAMPLES:
    Start a session:
        $ projspec-capture session-start --source startup

    Start a session from a hook, with the host's JSON piped in:
        $ projspec-capture --payload-stdin session-start

    Record an action:
        $ projspec-capture pre-tool --tool Edit --input src/lib.rs
        $ projspec-capture post-tool --tool Edit

    Record a failed action with user feedback:
        $ projspec-capture post-tool --tool Bash --error 'exit 1' \\
              --feedback \"No, don't use sudo\"

    Try the classifier:
        $ projspec-capture classify \"Actually, use the retry helper instead\"

    Inspect the current session:
        $ projspec-capture status

ENVIRONMENT:
    PROJSPEC_ROOT   Project root; skips the upward search for .projspec/
    PROJSPEC_LOG    Log filter for stderr output (default: warn)";

#[derive(Parser)]
#[command(name = "projspec-capture")]
#[command(version)]
#[command(about = "Session event capture and correction classification")]
#[command(long_about = LONG_ABOUT)]
#[command(after_help = AFTER_HELP)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Project root (defaults to the nearest directory containing .projspec/)
    #[arg(long, global = true, env = "PROJSPEC_ROOT")]
    root: Option<PathBuf>,

    /// Read the host's hook JSON payload from stdin
    #[arg(long, global = true)]
    payload_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a session and make it current
    #[command(
        long_about = "\
Start a session and make it current.

Creates .projspec/sessions/<date>/<id>/ with empty tools.jsonl and 
corrections.jsonl streams and a session.json metadata file, then points 
.projspec/current_session and .projspec/current_session_dir at it.

Re-running with the id of an existing session keeps its events and metadata.",
        after_help = "\
EXAMPLES:
    Generated id:
        $ projspec-capture session-start

    Host-supplied id:
        $ projspec-capture session-start --session-id 4f1c9e --source resume"
    )]
    SessionStart {
        /// Session id to use instead of a generated one
        #[arg(long)]
        session_id: Option<String>,

        /// Where the session came from (startup, resume, clear, compact, ...)
        #[arg(long)]
        source: Option<String>,
    },

    /// Record the moment before an action runs
    PreTool {
        /// Tool or operation name
        #[arg(long)]
        tool: Option<String>,

        /// Short description of the action's target
        #[arg(long)]
        input: Option<String>,

        /// Host identifier for this action, used to pair it with its post
        #[arg(long)]
        call_id: Option<String>,
    },

    /// Record the moment after an action ran
    PostTool {
        /// Tool or operation name
        #[arg(long)]
        tool: Option<String>,

        /// Error text; marks the action as failed
        #[arg(long)]
        error: Option<String>,

        /// Free-text user feedback to classify
        #[arg(long)]
        feedback: Option<String>,

        /// Host identifier for this action, used to pair it with its pre
        #[arg(long)]
        call_id: Option<String>,
    },

    /// Classify a piece of feedback and print the label
    Classify {
        /// Text to classify
        text: String,
    },

    /// Display the current session and its event counts
    Status,
}

fn main() {
    let filter = EnvFilter::try_from_env("PROJSPEC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = cli.root.as_deref();
    let payload_stdin = cli.payload_stdin;

    let result = match cli.command {
        Commands::SessionStart { session_id, source } => {
            let options = commands::session_start::SessionStartOptions {
                session_id,
                source,
                payload_stdin,
            };
            if let Err(e) = commands::session_start::run(root, options) {
                warn!("session start failed: {}", e);
            }
            Ok(())
        }
        Commands::PreTool { tool, input, call_id } => {
            commands::capture::run_pre(
                root,
                commands::capture::PreToolOptions { tool, input, call_id, payload_stdin },
            );
            Ok(())
        }
        Commands::PostTool { tool, error, feedback, call_id } => {
            commands::capture::run_post(
                root,
                commands::capture::PostToolOptions { tool, error, feedback, call_id, payload_stdin },
            );
            Ok(())
        }
        Commands::Classify { text } => {
            commands::classify::run(&text);
            Ok(())
        }
        Commands::Status => commands::status::run(root),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
