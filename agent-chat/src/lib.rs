//! Agent chat: the interactive session engine behind the `openhands` binary.

pub mod config;
pub mod conversation;
pub mod error;
pub mod input;
pub mod message;
pub mod provider;
pub mod session;
pub mod share;
pub mod slashcmd;

use std::io::IsTerminal;
use std::path::Path;

use tokio::io::{AsyncWrite, BufReader};
use tracing::info;

use crate::config::{get_config_file, load_config};
use crate::conversation::Conversation;
use crate::input::{BufReadLines, LineReader, TerminalLines};
use crate::provider::create_provider;
use crate::session::ChatSession;
use crate::share::{ensure_share_dir, get_conversations_dir, get_input_history_file};

pub use crate::error::{ChatError, InterruptKind};

/// Parameters accepted by [`run_cli_entry`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Conversation to continue; a new id is generated when unset.
    pub resume_conversation_id: Option<String>,
    /// First user turn sent before reading from the terminal.
    pub initial_user_message: Option<String>,
}

/// Runs an interactive session on stdin/stdout until it finishes or fails.
///
/// A terminal gets a rustyline editor, which reports Ctrl-C at the prompt
/// itself; piped input is read as plain lines. Ctrl-C while a reply is being
/// produced surfaces as [`ChatError::Interrupted`] rather than killing the process.
pub async fn run_cli_entry(options: RunOptions) -> Result<(), ChatError> {
    let share_dir = ensure_share_dir().await?;
    let output = tokio::io::stdout();
    let session = async {
        if std::io::stdin().is_terminal() {
            let input = TerminalLines::spawn(Some(get_input_history_file(&share_dir)));
            run_session(options, &share_dir, input, output).await
        } else {
            let input = BufReadLines::new(BufReader::new(tokio::io::stdin()));
            run_session(options, &share_dir, input, output).await
        }
    };

    tokio::select! {
        result = session => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C");
            Err(ChatError::Interrupted(InterruptKind::CtrlC))
        }
    }
}

/// Runs a session rooted at `share_dir` over the given input and output.
pub async fn run_session<I, W>(
    options: RunOptions,
    share_dir: &Path,
    input: I,
    output: W,
) -> Result<(), ChatError>
where
    I: LineReader,
    W: AsyncWrite + Unpin,
{
    let config = load_config(&get_config_file(share_dir)).await?;
    let provider = create_provider(&config.provider)?;
    let conversation = Conversation::open(
        &get_conversations_dir(share_dir),
        options.resume_conversation_id.as_deref(),
    )
    .await?;

    let mut session = ChatSession::new(provider, conversation, config.prompt, input, output).await?;
    session.print_banner(config.replay_on_resume).await?;
    session.run(options.initial_user_message).await
}
