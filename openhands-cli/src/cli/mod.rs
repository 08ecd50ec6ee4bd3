use std::future::Future;
use std::io::Write;
use std::path::PathBuf;

use agent_chat::{ChatError, InterruptKind, RunOptions};
use anyhow::Result;
use clap::Parser;
use clap::builder::{OsStringValueParser, TypedValueParser};
use tracing::{debug, info, warn};

use crate::console::Console;
use crate::utils::{debug_enabled, init_logging};

pub mod dispatch;
pub mod task;

pub use dispatch::report_outcome;
pub use task::build_initial_message;

#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(
    name = "openhands",
    about = "OpenHands CLI - Terminal User Interface for OpenHands AI Agent",
    version,
    max_term_width = 100
)]
pub struct Cli {
    #[arg(
        long,
        value_name = "CONVERSATION_ID",
        help = "Conversation ID to use for the session. Default: a random UUID."
    )]
    pub resume: Option<String>,

    #[arg(
        long,
        value_name = "TEXT",
        help = "Initial task for the agent to perform. Ignored if --file is provided."
    )]
    pub task: Option<String>,

    #[arg(
        long,
        value_name = "PATH",
        value_parser = OsStringValueParser::new().map(PathBuf::from),
        help = "Path to a file containing the task or context. Overrides --task if both are provided."
    )]
    pub file: Option<PathBuf>,
}

pub async fn run() -> Result<()> {
    // Logging is configured before anything touches the chat engine.
    init_logging(debug_enabled()).await?;

    let cli = Cli::parse();
    let mut console = Console::stdout();
    run_with(
        cli,
        agent_chat::run_cli_entry,
        ctrl_c(),
        &mut console,
        &mut std::io::stderr(),
    )
    .await
}

/// Completes on Ctrl-C; never completes if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Resolves the initial message, runs `entry`, and reports its outcome.
///
/// `interrupt` completing at any point before the session ends counts as a
/// user interrupt, including while the `--file` content is being read.
pub async fn run_with<F, Fut, I, W, T>(
    cli: Cli,
    entry: F,
    interrupt: I,
    console: &mut Console<W>,
    trace: &mut T,
) -> Result<()>
where
    F: FnOnce(RunOptions) -> Fut,
    Fut: Future<Output = Result<(), ChatError>>,
    I: Future<Output = ()>,
    W: Write,
    T: Write,
{
    let session = async move {
        let initial_user_message =
            build_initial_message(cli.file.as_deref(), cli.task.as_deref()).await;
        debug!(
            resume = ?cli.resume,
            has_initial_message = initial_user_message.is_some(),
            "Resolved invocation"
        );

        info!("Starting agent chat");
        entry(RunOptions {
            resume_conversation_id: cli.resume,
            initial_user_message,
        })
        .await
    };

    let result = tokio::select! {
        result = session => result,
        () = interrupt => {
            info!("Received Ctrl-C");
            Err(ChatError::Interrupted(InterruptKind::CtrlC))
        }
    };
    report_outcome(result, console, trace)
}
