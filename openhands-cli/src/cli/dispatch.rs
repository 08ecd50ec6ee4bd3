use std::io::Write;

use agent_chat::ChatError;
use tracing::{error, info};

use crate::console::{Console, escape};

pub const MISSING_DEPENDENCY_HINT: &str =
    "<yellow>Please ensure the agent SDK is properly installed.</yellow>";
pub const GOODBYE: &str = "\n<yellow>Goodbye! 👋</yellow>";

/// Reports how the chat session ended.
///
/// Interrupts are absorbed into a goodbye. Every other failure is printed and
/// returned so the process exits non-zero; unclassified ones also get their
/// full error chain written to `trace`.
pub fn report_outcome<W, T>(
    result: Result<(), ChatError>,
    console: &mut Console<W>,
    trace: &mut T,
) -> anyhow::Result<()>
where
    W: Write,
    T: Write,
{
    let err = match result {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };

    match err {
        ChatError::MissingDependency(detail) => {
            error!(detail = %detail, "Agent chat dependencies are missing");
            console.print_formatted(&format!(
                "<red>Error: Agent chat requires additional dependencies: {}</red>",
                escape(&detail)
            ))?;
            console.print_formatted(MISSING_DEPENDENCY_HINT)?;
            Err(ChatError::MissingDependency(detail).into())
        }
        ChatError::Interrupted(kind) => {
            info!(%kind, "Session interrupted by user");
            console.print_formatted(GOODBYE)?;
            Ok(())
        }
        err => {
            console.print_formatted(&format!(
                "<red>Error starting agent chat: {}</red>",
                escape(&err.to_string())
            ))?;
            let err = anyhow::Error::new(err);
            error!(error = ?err, "Agent chat failed");
            writeln!(trace, "{err:?}")?;
            trace.flush()?;
            Err(err)
        }
    }
}
